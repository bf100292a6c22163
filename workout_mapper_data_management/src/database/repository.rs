use std::future::Future;

use chrono::{DateTime, Utc};
use workout_mapper_lib::{
    track::{StoredTrack, Track},
    track_point::TrackPoint,
};

use crate::DataManagerError;

/// Persistent storage for tracks and their points.
pub trait TrackRepository: Send + Sync {
    /// Removes every table. The store must be recreated with `ensure_created` before use.
    fn delete_all(&self) -> impl Future<Output = Result<(), DataManagerError>> + Send;

    /// Creates the schema if it is missing. Safe to call concurrently and repeatedly.
    fn ensure_created(&self) -> impl Future<Output = Result<(), DataManagerError>> + Send;

    fn add_track(&self, track: &Track) -> impl Future<Output = Result<i64, DataManagerError>> + Send;

    fn add_points(&self, track_id: i64, points: &[TrackPoint]) -> impl Future<Output = Result<(), DataManagerError>> + Send;

    fn count_tracks(&self) -> impl Future<Output = Result<i64, DataManagerError>> + Send;

    /// Tracks with `since < timestamp < until`, ordered by timestamp and then insertion order.
    fn query_tracks(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<StoredTrack>, DataManagerError>> + Send;

    fn query_points(&self, track_id: i64) -> impl Future<Output = Result<Vec<TrackPoint>, DataManagerError>> + Send;

    fn max_timestamp(&self) -> impl Future<Output = Result<Option<DateTime<Utc>>, DataManagerError>> + Send;
}
