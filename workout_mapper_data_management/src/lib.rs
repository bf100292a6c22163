use std::{future::Future, path::PathBuf};

use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub mod database;
pub mod events;
pub mod gpx;
pub mod importer;
pub mod options;
pub mod track_service;
mod data_manager;

#[cfg(test)]
pub(crate) mod testing;

pub use data_manager::*;

#[derive(Debug, Error)]
pub enum DataManagerError {
    #[error("track store unavailable during {operation}: {source}")]
    StoreUnavailable {
        operation: &'static str,
        source: sqlx::Error,
    },

    #[error("cannot read data directory {}: {source}", .path.display())]
    DataDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("operation was cancelled")]
    Cancelled,
}

/// Runs `operation` unless `cancel` fires first.
pub(crate) async fn until_cancelled<T>(
    cancel: &CancellationToken,
    operation: impl Future<Output = Result<T, DataManagerError>>,
) -> Result<T, DataManagerError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DataManagerError::Cancelled),
        result = operation => result,
    }
}
