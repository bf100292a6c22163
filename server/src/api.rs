use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use workout_mapper_data_management::DataManagerError;

use crate::{app_model::AppModel, server_state::ServerState};

/// Optional time window. Values are RFC 3339 instants in any offset.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackQuery {
    pub not_before: Option<DateTime<Utc>>,
    pub not_after: Option<DateTime<Utc>>,
}

pub async fn get_model(State(state): State<Arc<ServerState>>) -> Response {
    let cancel = state.shutdown.child_token();

    match state.data_manager.get_latest_track(&cancel).await {
        Ok(latest) => {
            let api_key = state.data_manager.options().google_maps_api_key.clone();
            Json(AppModel::new(api_key, latest, Utc::now())).into_response()
        }
        Err(err) => failure("get app model", err),
    }
}

pub async fn get_tracks(State(state): State<Arc<ServerState>>, Query(query): Query<TrackQuery>) -> Response {
    let cancel = state.shutdown.child_token();

    match state.data_manager.get_tracks(query.not_before, query.not_after, &cancel).await {
        Ok(tracks) => Json(tracks).into_response(),
        Err(err) => failure("get tracks", err),
    }
}

pub async fn get_track_count(State(state): State<Arc<ServerState>>) -> Response {
    let cancel = state.shutdown.child_token();

    match state.data_manager.get_track_count(&cancel).await {
        Ok(count) => Json(count).into_response(),
        Err(err) => failure("get track count", err),
    }
}

pub async fn get_summary(State(state): State<Arc<ServerState>>, Query(query): Query<TrackQuery>) -> Response {
    let cancel = state.shutdown.child_token();

    match state.data_manager.get_summary(query.not_before, query.not_after, &cancel).await {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => failure("get track summary", err),
    }
}

pub async fn import_tracks(State(state): State<Arc<ServerState>>) -> Response {
    let cancel = state.shutdown.child_token();

    match state.data_manager.import_tracks(&cancel).await {
        Ok(count) => {
            tracing::info!("Imported {} track(s)", count.count);
            (StatusCode::CREATED, Json(count)).into_response()
        }
        Err(err) => failure("import tracks", err),
    }
}

fn failure(operation: &str, err: DataManagerError) -> Response {
    tracing::error!("Failed to {}: {}", operation, err);

    match err {
        DataManagerError::Cancelled => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
