use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "sqlx")]
use sqlx::{prelude::*, sqlite::SqliteRow};

use super::track_point::TrackPoint;

/// A named activity. `timestamp` is the timestamp of the first point in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub points: Vec<TrackPoint>,
}

impl Track {
    /// Returns `None` when there are no points, as a track without points has no timestamp.
    pub fn from_points(name: String, points: Vec<TrackPoint>) -> Option<Self> {
        let timestamp = points.first()?.timestamp;

        Some(Self {
            name,
            timestamp,
            points,
        })
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.points.last().map(|point| point.timestamp).unwrap_or(self.timestamp)
    }
}

/// A persisted track header. Its points are loaded separately by `track_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTrack {
    pub track_id: i64,
    pub name: String,
    pub timestamp: DateTime<Utc>,
}

impl StoredTrack {
    pub fn into_track(self, points: Vec<TrackPoint>) -> Track {
        Track {
            name: self.name,
            timestamp: self.timestamp,
            points,
        }
    }
}

#[cfg(feature = "sqlx")]
impl FromRow<'_, SqliteRow> for StoredTrack {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            track_id: row.try_get("track_id")?,
            name: row.try_get("name")?,
            timestamp: crate::timestamp::decode_column(row, "timestamp")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackCount {
    pub count: i64,
}
