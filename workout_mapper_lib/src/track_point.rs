use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};
#[cfg(feature = "sqlx")]
use sqlx::{prelude::*, sqlite::SqliteRow};

/// A single GPS fix. Coordinates are signed decimal degrees and are not range checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl TrackPoint {
    pub fn new(longitude: f64, latitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

#[cfg(feature = "sqlx")]
impl FromRow<'_, SqliteRow> for TrackPoint {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            timestamp: crate::timestamp::decode_column(row, "timestamp")?,
        })
    }
}
