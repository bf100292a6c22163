use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio_util::sync::CancellationToken;
use workout_mapper_lib::track::Track;

use super::{TRACK_FILE_EXTENSION, reader::read_tracks};
use crate::{
    DataManagerError,
    events::{EventSink, TrackEvent},
    options::ApplicationOptions,
};

/// Turns a directory of GPX files into one list of tracks sorted by timestamp.
#[derive(Clone)]
pub struct TrackParser {
    data_directory: PathBuf,
    events: Arc<dyn EventSink>,
}

impl TrackParser {
    pub fn new(options: &ApplicationOptions, events: Arc<dyn EventSink>) -> Self {
        Self {
            data_directory: options.data_directory.clone(),
            events,
        }
    }

    pub fn data_directory(&self) -> &Path {
        &self.data_directory
    }

    /// Files that cannot be read are skipped. Cancellation is observed between files
    /// and while a file is being read.
    pub async fn get_tracks(&self, cancel: &CancellationToken) -> Result<Vec<Track>, DataManagerError> {
        self.events.emit(TrackEvent::ParseStarted {
            directory: self.data_directory.clone(),
        });

        let mut result = Vec::new();

        for path in self.track_files().await? {
            if cancel.is_cancelled() {
                return Err(DataManagerError::Cancelled);
            }

            let read = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(DataManagerError::Cancelled),
                read = read_tracks(&path, self.events.as_ref()) => read,
            };

            match read {
                Ok(tracks) => result.extend(tracks),
                Err(error) => self.events.emit(TrackEvent::FileSkipped {
                    path,
                    reason: error.to_string(),
                }),
            }
        }

        // Stable, so tracks sharing a timestamp keep file name and document order.
        result.sort_by_key(|track| track.timestamp);

        self.events.emit(TrackEvent::ParseFinished {
            directory: self.data_directory.clone(),
            count: result.len(),
        });

        Ok(result)
    }

    /// Regular files directly inside the data directory with a `.gpx` extension, sorted by path.
    async fn track_files(&self) -> Result<Vec<PathBuf>, DataManagerError> {
        let directory_error = |source| DataManagerError::DataDirectory {
            path: self.data_directory.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.data_directory).await.map_err(directory_error)?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(directory_error)? {
            let path = entry.path();

            if !has_track_extension(&path) {
                continue;
            }

            match tokio::fs::metadata(&path).await {
                Ok(metadata) if metadata.is_file() => files.push(path),
                _ => {}
            }
        }

        files.sort();

        Ok(files)
    }
}

fn has_track_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case(TRACK_FILE_EXTENSION))
}
