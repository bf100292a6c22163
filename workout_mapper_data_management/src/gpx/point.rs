use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use thiserror::Error;
use workout_mapper_lib::track_point::TrackPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Longitude,
    Latitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Longitude => write!(f, "longitude"),
            Axis::Latitude => write!(f, "latitude"),
        }
    }
}

/// Why a single point was left out of its track. `raw` is `None` when the value is missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointRejection {
    #[error("invalid {axis} value {raw:?}")]
    InvalidCoordinate { axis: Axis, raw: Option<String> },

    #[error("invalid timestamp value {raw:?}")]
    InvalidTimestamp { raw: Option<String> },
}

/// Validates the raw fields of one `trkpt`. Longitude is checked first, then latitude, then time.
pub fn validate_point(longitude: Option<&str>, latitude: Option<&str>, time: Option<&str>) -> Result<TrackPoint, PointRejection> {
    let longitude = parse_coordinate(Axis::Longitude, longitude)?;
    let latitude = parse_coordinate(Axis::Latitude, latitude)?;
    let timestamp = parse_timestamp(time)?;

    Ok(TrackPoint::new(longitude, latitude, timestamp))
}

/// Parses a locale invariant decimal: optional sign, digits and at most one period.
/// No range check is made, only that the value is finite.
pub fn parse_coordinate(axis: Axis, raw: Option<&str>) -> Result<f64, PointRejection> {
    let rejection = || PointRejection::InvalidCoordinate {
        axis,
        raw: raw.map(str::to_owned),
    };

    let text = raw.ok_or_else(rejection)?.trim();
    let unsigned = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);

    let is_decimal = unsigned.chars().any(|c| c.is_ascii_digit())
        && unsigned.chars().all(|c| c.is_ascii_digit() || c == '.')
        && unsigned.matches('.').count() <= 1;

    if !is_decimal {
        return Err(rejection());
    }

    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(rejection)
}

/// Parses an ISO 8601 date-time and converts it to UTC. Values without an offset are taken as UTC.
/// Precision is kept to the microsecond, the precision tracks are stored with.
pub fn parse_timestamp(raw: Option<&str>) -> Result<DateTime<Utc>, PointRejection> {
    raw.map(str::trim)
        .and_then(parse_instant)
        .map(|timestamp| timestamp.trunc_subsecs(6))
        .ok_or_else(|| PointRejection::InvalidTimestamp {
            raw: raw.map(str::to_owned),
        })
}

fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc));
    }

    // Basic format offsets such as +0200
    if let Ok(timestamp) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(timestamp.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, format) {
            return Some(timestamp.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|timestamp| timestamp.and_utc())
}
