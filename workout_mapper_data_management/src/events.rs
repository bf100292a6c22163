use std::{path::PathBuf, time::Duration};

use chrono::{DateTime, Utc};

use crate::gpx::point::PointRejection;

/// Notable things that happen while parsing and importing tracks.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackEvent {
    ParseStarted {
        directory: PathBuf,
    },
    FileSkipped {
        path: PathBuf,
        reason: String,
    },
    PointRejected {
        path: PathBuf,
        track: String,
        rejection: PointRejection,
    },
    TrackDiscarded {
        path: PathBuf,
        track: String,
    },
    TrackParsed {
        path: PathBuf,
        name: String,
        timestamp: DateTime<Utc>,
        points: usize,
    },
    ParseFinished {
        directory: PathBuf,
        count: usize,
    },
    StoreReset,
    TrackImported {
        track_id: i64,
        name: String,
        timestamp: DateTime<Utc>,
        points: usize,
    },
    ImportFinished {
        count: usize,
        elapsed: Duration,
    },
}

/// Where parse and import events are routed. The core never logs directly.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: TrackEvent);
}

/// Routes events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEvents;

impl EventSink for TracingEvents {
    fn emit(&self, event: TrackEvent) {
        match event {
            TrackEvent::ParseStarted { directory } => {
                tracing::info!("Parsing track data from {}", directory.display());
            }
            TrackEvent::FileSkipped { path, reason } => {
                tracing::error!("Failed to load track XML from {}: {}", path.display(), reason);
            }
            TrackEvent::PointRejected { path, track, rejection } => {
                tracing::warn!("Ignoring segment point in track {:?} from {}: {}", track, path.display(), rejection);
            }
            TrackEvent::TrackDiscarded { path, track } => {
                tracing::debug!("Track {:?} from {} has no valid points", track, path.display());
            }
            TrackEvent::TrackParsed { path, name, timestamp, points } => {
                tracing::debug!(
                    "Added {} point(s) for track {:?} with timestamp {} from {}",
                    points,
                    name,
                    timestamp.to_rfc3339(),
                    path.display()
                );
            }
            TrackEvent::ParseFinished { directory, count } => {
                tracing::info!("Parsed {} track(s) from {}", count, directory.display());
            }
            TrackEvent::StoreReset => {
                tracing::info!("Deleted existing tracks and recreated the database");
            }
            TrackEvent::TrackImported { track_id, name, timestamp, points } => {
                tracing::debug!("Imported track {} {:?} ({}) with {} point(s)", track_id, name, timestamp.to_rfc3339(), points);
            }
            TrackEvent::ImportFinished { count, elapsed } => {
                tracing::info!("Imported {} track(s) to database in {:?}", count, elapsed);
            }
        }
    }
}
