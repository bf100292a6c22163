use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use workout_mapper_lib::track::{Track, TrackCount};

use crate::{DataManagerError, database::TrackRepository, until_cancelled};

/// Read path over persisted tracks.
#[derive(Clone)]
pub struct TrackService<R> {
    repository: R,
}

impl<R: TrackRepository> TrackService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Tracks with `not_before < timestamp < not_after`, oldest first, each with its points in time order.
    /// Missing bounds are open-ended.
    pub async fn get_tracks(
        &self,
        not_before: Option<DateTime<Utc>>,
        not_after: Option<DateTime<Utc>>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Track>, DataManagerError> {
        let since = not_before.unwrap_or(DateTime::<Utc>::MIN_UTC);
        let until = not_after.unwrap_or(DateTime::<Utc>::MAX_UTC);

        until_cancelled(cancel, self.load_tracks(since, until)).await
    }

    pub async fn get_track_count(&self, cancel: &CancellationToken) -> Result<TrackCount, DataManagerError> {
        until_cancelled(cancel, self.count_tracks()).await
    }

    /// Timestamp of the most recent track, if any.
    pub async fn get_latest_track(&self, cancel: &CancellationToken) -> Result<Option<DateTime<Utc>>, DataManagerError> {
        until_cancelled(cancel, self.latest_timestamp()).await
    }

    async fn load_tracks(&self, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<Track>, DataManagerError> {
        self.repository.ensure_created().await?;

        let stored = self.repository.query_tracks(since, until).await?;
        let mut tracks = Vec::with_capacity(stored.len());

        for header in stored {
            let mut points = self.repository.query_points(header.track_id).await?;
            points.sort_by_key(|point| point.timestamp);
            tracks.push(header.into_track(points));
        }

        Ok(tracks)
    }

    async fn count_tracks(&self) -> Result<TrackCount, DataManagerError> {
        self.repository.ensure_created().await?;

        let count = self.repository.count_tracks().await?;
        Ok(TrackCount { count })
    }

    async fn latest_timestamp(&self) -> Result<Option<DateTime<Utc>>, DataManagerError> {
        self.repository.ensure_created().await?;
        self.repository.max_timestamp().await
    }
}
