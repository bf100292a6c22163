use std::{path::Path, sync::Arc};

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request, header::CACHE_CONTROL},
    middleware::{Next, from_fn},
    response::Response,
    routing::{get, post},
};
use tower_http::{compression::CompressionLayer, services::ServeDir};

use server_state::ServerState;

pub mod api;
pub mod app_model;
pub mod server_state;

const API_PREFIX: &str = "/api/";

// Scripts, styles and images carry a content hash in their file names.
const HASHED_ASSET_EXTENSIONS: [&str; 3] = ["css", "js", "svg"];
const HASHED_ASSET_CACHE_CONTROL: &str = "max-age=31536000";
const STATIC_FILE_CACHE_CONTROL: &str = "max-age=604800";

/// API routes, with the static front end as the fallback. Responses are compressed when the client accepts it.
pub fn router(state: Arc<ServerState>, static_directory: &Path) -> Router {
    Router::new()
        .route("/api/model", get(api::get_model))
        .route("/api/tracks", get(api::get_tracks))
        .route("/api/tracks/count", get(api::get_track_count))
        .route("/api/tracks/summary", get(api::get_summary))
        .route("/api/tracks/import", post(api::import_tracks))
        .fallback_service(ServeDir::new(static_directory))
        .with_state(state)
        .layer(from_fn(cache_static_files))
        .layer(CompressionLayer::new())
        .layer(from_fn(log_request))
}

async fn log_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let response = next.run(req).await;
    tracing::debug!("{} {} -> {}", method, path, response.status());

    response
}

async fn cache_static_files(req: Request<Body>, next: Next) -> Response {
    let cache_control = static_cache_control(req.uri().path());
    let mut response = next.run(req).await;

    if let Some(cache_control) = cache_control {
        if response.status().is_success() {
            response.headers_mut().insert(CACHE_CONTROL, HeaderValue::from_static(cache_control));
        }
    }

    response
}

fn static_cache_control(path: &str) -> Option<&'static str> {
    if path.starts_with(API_PREFIX) {
        return None;
    }

    let hashed = Path::new(path)
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| HASHED_ASSET_EXTENSIONS.iter().any(|hashed| extension.eq_ignore_ascii_case(hashed)));

    Some(if hashed { HASHED_ASSET_CACHE_CONTROL } else { STATIC_FILE_CACHE_CONTROL })
}
