use std::path::Path;

use workout_mapper_lib::track::Track;

use super::{
    ReadError,
    document::{GpxDocument, name_element, point_elements, segment_elements, time_element, track_elements},
    point::validate_point,
};
use crate::events::{EventSink, TrackEvent};

/// Reads every track in one GPX file. Rejected points are reported and left out;
/// tracks left without points are dropped.
pub async fn read_tracks(path: &Path, events: &dyn EventSink) -> Result<Vec<Track>, ReadError> {
    let bytes = tokio::fs::read(path).await?;
    parse_tracks(&bytes, path, events)
}

pub fn parse_tracks(bytes: &[u8], path: &Path, events: &dyn EventSink) -> Result<Vec<Track>, ReadError> {
    let document = GpxDocument::parse(bytes)?;
    let mut tracks = Vec::new();

    for track_element in track_elements(&document) {
        let name = name_element(track_element).map(|element| element.value()).unwrap_or_default();
        let mut points = Vec::new();

        for segment in segment_elements(track_element) {
            for point in point_elements(segment) {
                let time = time_element(point).map(|element| element.value());

                match validate_point(point.attribute("lon"), point.attribute("lat"), time.as_deref()) {
                    Ok(track_point) => points.push(track_point),
                    Err(rejection) => events.emit(TrackEvent::PointRejected {
                        path: path.to_path_buf(),
                        track: name.clone(),
                        rejection,
                    }),
                }
            }
        }

        let Some(track) = Track::from_points(name.clone(), points) else {
            events.emit(TrackEvent::TrackDiscarded {
                path: path.to_path_buf(),
                track: name,
            });
            continue;
        };

        events.emit(TrackEvent::TrackParsed {
            path: path.to_path_buf(),
            name: track.name.clone(),
            timestamp: track.timestamp,
            points: track.points.len(),
        });

        tracks.push(track);
    }

    Ok(tracks)
}
