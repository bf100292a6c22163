use std::{path::Path, sync::Arc};

use chrono::{DateTime, Utc};
use const_format::concatcp;
use sqlx::{Executor, Pool, Sqlite, SqlitePool, query, query_as, sqlite::SqliteConnectOptions};
use tokio::sync::Mutex;
use workout_mapper_lib::{
    timestamp::{from_storage, to_storage, to_storage_ceil},
    track::{StoredTrack, Track},
    track_point::TrackPoint,
};

use super::{constants::*, repository::TrackRepository};
use crate::DataManagerError;

fn unavailable(operation: &'static str) -> impl FnOnce(sqlx::Error) -> DataManagerError {
    move |source| DataManagerError::StoreUnavailable { operation, source }
}

/// SQLite backed track store.
#[derive(Clone)]
pub struct TrackDatabase {
    pool: Pool<Sqlite>,
    ready: Arc<Mutex<bool>>,
}

impl TrackDatabase {
    /// Opens the database file, creating it if missing. The schema is created lazily.
    pub async fn connect(path: &Path) -> Result<Self, DataManagerError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await.map_err(unavailable("connect"))?;

        Ok(Self {
            pool,
            ready: Arc::new(Mutex::new(false)),
        })
    }

    async fn create_schema(&self) -> Result<(), DataManagerError> {
        self.pool
            .execute(concatcp!(
                "
            CREATE TABLE IF NOT EXISTS ", TRACKS_TABLE_NAME, "(",
                TRACK_ID,  " INTEGER PRIMARY KEY AUTOINCREMENT,",
                NAME,      " TEXT NOT NULL,",
                TIMESTAMP, " INTEGER NOT NULL);

            CREATE INDEX IF NOT EXISTS IX_", TRACKS_TABLE_NAME, "_", TIMESTAMP,
                " ON ", TRACKS_TABLE_NAME, "(", TIMESTAMP, ");

            CREATE TABLE IF NOT EXISTS ", TRACK_POINTS_TABLE_NAME, "(",
                POINT_ID,  " INTEGER PRIMARY KEY AUTOINCREMENT,",
                TRACK_ID,  " INTEGER NOT NULL,",
                LONGITUDE, " REAL NOT NULL,",
                LATITUDE,  " REAL NOT NULL,",
                TIMESTAMP, " INTEGER NOT NULL,
                FOREIGN KEY(", TRACK_ID, ") REFERENCES ", TRACKS_TABLE_NAME, "(", TRACK_ID, ") ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS IX_", TRACK_POINTS_TABLE_NAME, "_", TRACK_ID,
                " ON ", TRACK_POINTS_TABLE_NAME, "(", TRACK_ID, ");"
            ))
            .await
            .map_err(unavailable("create schema"))
            .map(|_| ())
    }
}

impl TrackRepository for TrackDatabase {
    async fn delete_all(&self) -> Result<(), DataManagerError> {
        let mut ready = self.ready.lock().await;

        self.pool
            .execute(concatcp!(
                "DROP TABLE IF EXISTS ", TRACK_POINTS_TABLE_NAME, ";",
                "DROP TABLE IF EXISTS ", TRACKS_TABLE_NAME, ";"
            ))
            .await
            .map_err(unavailable("delete all tracks"))?;

        *ready = false;
        Ok(())
    }

    async fn ensure_created(&self) -> Result<(), DataManagerError> {
        let mut ready = self.ready.lock().await;

        if !*ready {
            self.create_schema().await?;
            *ready = true;
        }

        Ok(())
    }

    async fn add_track(&self, track: &Track) -> Result<i64, DataManagerError> {
        query_as::<_, (i64,)>(concatcp!(
            "INSERT INTO ", TRACKS_TABLE_NAME, "(", TRACK_ID, ", ", NAME, ", ", TIMESTAMP, ")
            VALUES (NULL, ?1, ?2) RETURNING ", TRACK_ID
        ))
        .bind(&track.name)
        .bind(to_storage(track.timestamp))
        .fetch_one(&self.pool)
        .await
        .map_err(unavailable("insert track"))
        .map(|row| row.0)
    }

    async fn add_points(&self, track_id: i64, points: &[TrackPoint]) -> Result<(), DataManagerError> {
        let mut transaction = self.pool.begin().await.map_err(unavailable("insert track points"))?;

        for point in points {
            query(concatcp!(
                "INSERT INTO ", TRACK_POINTS_TABLE_NAME, "(", TRACK_ID, ", ", LONGITUDE, ", ", LATITUDE, ", ", TIMESTAMP, ")
                VALUES (?1, ?2, ?3, ?4)"
            ))
            .bind(track_id)
            .bind(point.longitude)
            .bind(point.latitude)
            .bind(to_storage(point.timestamp))
            .execute(&mut *transaction)
            .await
            .map_err(unavailable("insert track points"))?;
        }

        transaction.commit().await.map_err(unavailable("insert track points"))
    }

    async fn count_tracks(&self) -> Result<i64, DataManagerError> {
        query_as::<_, (i64,)>(concatcp!("SELECT COUNT(*) FROM ", TRACKS_TABLE_NAME))
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable("count tracks"))
            .map(|row| row.0)
    }

    async fn query_tracks(&self, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<StoredTrack>, DataManagerError> {
        query_as::<_, StoredTrack>(concatcp!(
            "SELECT ", TRACK_ID, ", ", NAME, ", ", TIMESTAMP, " FROM ", TRACKS_TABLE_NAME,
            " WHERE ", TIMESTAMP, " > ?1 AND ", TIMESTAMP, " < ?2
            ORDER BY ", TIMESTAMP, ", ", TRACK_ID
        ))
        .bind(to_storage(since))
        .bind(to_storage_ceil(until))
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable("query tracks"))
    }

    async fn query_points(&self, track_id: i64) -> Result<Vec<TrackPoint>, DataManagerError> {
        query_as::<_, TrackPoint>(concatcp!(
            "SELECT ", LATITUDE, ", ", LONGITUDE, ", ", TIMESTAMP, " FROM ", TRACK_POINTS_TABLE_NAME,
            " WHERE ", TRACK_ID, " = ?1 ORDER BY ", TIMESTAMP, ", ", POINT_ID
        ))
        .bind(track_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable("query track points"))
    }

    async fn max_timestamp(&self) -> Result<Option<DateTime<Utc>>, DataManagerError> {
        let row = query_as::<_, (Option<i64>,)>(concatcp!("SELECT MAX(", TIMESTAMP, ") FROM ", TRACKS_TABLE_NAME))
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable("query latest track"))?;

        Ok(row.0.and_then(from_storage))
    }
}
