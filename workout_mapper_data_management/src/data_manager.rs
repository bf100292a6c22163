use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use workout_mapper_lib::{
    summary::TracksSummary,
    track::{Track, TrackCount},
};

use crate::{
    DataManagerError,
    database::TrackDatabase,
    events::EventSink,
    gpx::parser::TrackParser,
    importer::TrackImporter,
    options::ApplicationOptions,
    track_service::TrackService,
};

#[derive(Clone)]
pub struct DataManager {
    options: ApplicationOptions,
    tracks: TrackService<TrackDatabase>,
    importer: TrackImporter<TrackDatabase>,
}

/// The public interface for all workout track data management.
impl DataManager {
    pub async fn start(options: ApplicationOptions, events: Arc<dyn EventSink>) -> Result<Self, DataManagerError> {
        // Create data dir if it doesn't exist
        tokio::fs::create_dir_all(&options.data_directory)
            .await
            .map_err(|source| DataManagerError::DataDirectory {
                path: options.data_directory.clone(),
                source,
            })?;

        let database = TrackDatabase::connect(&options.database_file()).await?;
        let parser = TrackParser::new(&options, events.clone());

        Ok(DataManager {
            tracks: TrackService::new(database.clone()),
            importer: TrackImporter::new(parser, database, events),
            options,
        })
    }

    pub fn options(&self) -> &ApplicationOptions {
        &self.options
    }

    /// Discards everything stored and imports the tracks found in the data directory.
    pub async fn import_tracks(&self, cancel: &CancellationToken) -> Result<TrackCount, DataManagerError> {
        let count = self.importer.import_tracks(cancel).await?;

        Ok(TrackCount { count: count as i64 })
    }

    pub async fn get_tracks(
        &self,
        not_before: Option<DateTime<Utc>>,
        not_after: Option<DateTime<Utc>>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Track>, DataManagerError> {
        self.tracks.get_tracks(not_before, not_after, cancel).await
    }

    pub async fn get_track_count(&self, cancel: &CancellationToken) -> Result<TrackCount, DataManagerError> {
        self.tracks.get_track_count(cancel).await
    }

    pub async fn get_latest_track(&self, cancel: &CancellationToken) -> Result<Option<DateTime<Utc>>, DataManagerError> {
        self.tracks.get_latest_track(cancel).await
    }

    pub async fn get_summary(
        &self,
        not_before: Option<DateTime<Utc>>,
        not_after: Option<DateTime<Utc>>,
        cancel: &CancellationToken,
    ) -> Result<TracksSummary, DataManagerError> {
        let tracks = self.tracks.get_tracks(not_before, not_after, cancel).await?;

        Ok(TracksSummary::of(&tracks))
    }
}
