use std::{sync::Arc, time::Instant};

use tokio_util::sync::CancellationToken;

use crate::{
    DataManagerError,
    database::TrackRepository,
    events::{EventSink, TrackEvent},
    gpx::parser::TrackParser,
};

/// Replaces the whole store with the tracks currently found in the data directory.
#[derive(Clone)]
pub struct TrackImporter<R> {
    parser: TrackParser,
    repository: R,
    events: Arc<dyn EventSink>,
}

impl<R: TrackRepository> TrackImporter<R> {
    pub fn new(parser: TrackParser, repository: R, events: Arc<dyn EventSink>) -> Self {
        Self {
            parser,
            repository,
            events,
        }
    }

    /// Returns the number of tracks imported. Existing data is discarded only once parsing has
    /// succeeded. A failure while writing leaves a partial store, and running the import again repairs it.
    pub async fn import_tracks(&self, cancel: &CancellationToken) -> Result<usize, DataManagerError> {
        let stopwatch = Instant::now();

        let tracks = self.parser.get_tracks(cancel).await?;

        self.repository.delete_all().await?;
        self.repository.ensure_created().await?;
        self.events.emit(TrackEvent::StoreReset);

        for track in &tracks {
            if cancel.is_cancelled() {
                return Err(DataManagerError::Cancelled);
            }

            let track_id = self.repository.add_track(track).await?;
            self.repository.add_points(track_id, &track.points).await?;

            self.events.emit(TrackEvent::TrackImported {
                track_id,
                name: track.name.clone(),
                timestamp: track.timestamp,
                points: track.points.len(),
            });
        }

        self.events.emit(TrackEvent::ImportFinished {
            count: tracks.len(),
            elapsed: stopwatch.elapsed(),
        });

        Ok(tracks.len())
    }
}
