use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};

use workout_mapper_lib::{
    track::{StoredTrack, Track},
    track_point::TrackPoint,
};

use crate::{
    DataManagerError,
    database::TrackRepository,
    events::{EventSink, TrackEvent},
    gpx::point::PointRejection,
};

pub const ROUTE_1: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="Apple Health Export" xmlns="http://www.topografix.com/GPX/1/1">
  <metadata>
    <time>2021-05-04T12:00:00Z</time>
  </metadata>
  <trk>
    <name>Route 1</name>
    <trkseg>
      <trkpt lon="-0.1285907" lat="51.5080900">
        <ele>12.5</ele>
        <time>2021-05-04T11:25:35Z</time>
      </trkpt>
      <trkpt lon="-0.1440787" lat="51.5013640">
        <ele>13.0</ele>
        <time>2021-05-04T11:45:12Z</time>
      </trkpt>
    </trkseg>
  </trk>
</gpx>
"#;

pub const ROUTE_2: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="Apple Health Export" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Route 2</name>
    <trkseg>
      <trkpt lon="-0.1285907" lat="51.5080900">
        <time>2021-05-05T11:25:35Z</time>
      </trkpt>
    </trkseg>
  </trk>
</gpx>
"#;

pub fn at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value).unwrap().to_utc()
}

/// Wraps track markup in a GPX 1.1 root element.
pub fn gpx_file(body: &str) -> String {
    format!(r#"<?xml version="1.0"?><gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">{body}</gpx>"#)
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[derive(Debug, Default, Clone)]
pub struct RecordingEvents {
    events: Arc<Mutex<Vec<TrackEvent>>>,
}

impl RecordingEvents {
    pub fn events(&self) -> Vec<TrackEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn rejections(&self) -> Vec<PointRejection> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                TrackEvent::PointRejected { rejection, .. } => Some(rejection),
                _ => None,
            })
            .collect()
    }

    pub fn skipped_files(&self) -> Vec<PathBuf> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                TrackEvent::FileSkipped { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingEvents {
    fn emit(&self, event: TrackEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// A store whose every operation fails.
#[derive(Debug, Clone, Copy)]
pub struct FailingRepository;

fn unavailable<T>(operation: &'static str) -> Result<T, DataManagerError> {
    Err(DataManagerError::StoreUnavailable {
        operation,
        source: sqlx::Error::PoolClosed,
    })
}

impl TrackRepository for FailingRepository {
    async fn delete_all(&self) -> Result<(), DataManagerError> {
        unavailable("delete all tracks")
    }

    async fn ensure_created(&self) -> Result<(), DataManagerError> {
        unavailable("create schema")
    }

    async fn add_track(&self, _track: &Track) -> Result<i64, DataManagerError> {
        unavailable("insert track")
    }

    async fn add_points(&self, _track_id: i64, _points: &[TrackPoint]) -> Result<(), DataManagerError> {
        unavailable("insert track points")
    }

    async fn count_tracks(&self) -> Result<i64, DataManagerError> {
        unavailable("count tracks")
    }

    async fn query_tracks(&self, _since: DateTime<Utc>, _until: DateTime<Utc>) -> Result<Vec<StoredTrack>, DataManagerError> {
        unavailable("query tracks")
    }

    async fn query_points(&self, _track_id: i64) -> Result<Vec<TrackPoint>, DataManagerError> {
        unavailable("query track points")
    }

    async fn max_timestamp(&self) -> Result<Option<DateTime<Utc>>, DataManagerError> {
        unavailable("query latest track")
    }
}
