use chrono::{DateTime, Utc};
use geo::{Distance, Haversine};
use serde::{Deserialize, Serialize};

use crate::track::Track;

/// Average CO2 emitted by a petrol car per kilometre driven.
pub const CO2_KG_PER_KM_DRIVEN: f64 = 0.171;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_seconds: i64,
    pub distance_meters: f64,
    pub average_pace_seconds_per_km: Option<f64>,
}

impl TrackSummary {
    pub fn of(track: &Track) -> Self {
        let distance_meters = distance_meters(track);
        let end = track.end();
        let duration_seconds = (end - track.timestamp).num_seconds();

        let average_pace_seconds_per_km = if distance_meters > 0.0 {
            Some(duration_seconds as f64 / (distance_meters / 1000.0))
        } else {
            None
        };

        Self {
            name: track.name.clone(),
            start: track.timestamp,
            end,
            duration_seconds,
            distance_meters,
            average_pace_seconds_per_km,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracksSummary {
    pub count: usize,
    pub total_distance_meters: f64,
    pub emissions_saved_kg: f64,
    pub tracks: Vec<TrackSummary>,
}

impl TracksSummary {
    pub fn of(tracks: &[Track]) -> Self {
        let tracks: Vec<TrackSummary> = tracks.iter().map(TrackSummary::of).collect();
        let total_distance_meters: f64 = tracks.iter().map(|summary| summary.distance_meters).sum();

        Self {
            count: tracks.len(),
            total_distance_meters,
            emissions_saved_kg: emissions_saved_kg(total_distance_meters),
            tracks,
        }
    }
}

/// Length of the point sequence in the order the points are stored.
pub fn distance_meters(track: &Track) -> f64 {
    track
        .points
        .windows(2)
        .map(|pair| Haversine.distance(pair[0].position(), pair[1].position()))
        .sum()
}

pub fn emissions_saved_kg(distance_meters: f64) -> f64 {
    distance_meters / 1000.0 * CO2_KG_PER_KM_DRIVEN
}
