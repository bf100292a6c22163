use chrono::{DateTime, Utc};

/// Timestamps are persisted as microseconds since the Unix epoch, so range filters compare numerically.
pub fn to_storage(timestamp: DateTime<Utc>) -> i64 {
    timestamp.timestamp_micros()
}

/// Rounds up to the next whole microsecond. Used for exclusive upper bounds, where rounding down
/// would exclude values that lie before the bound.
pub fn to_storage_ceil(timestamp: DateTime<Utc>) -> i64 {
    let micros = timestamp.timestamp_micros();

    if timestamp.timestamp_subsec_nanos() % 1_000 == 0 {
        micros
    } else {
        micros.saturating_add(1)
    }
}

pub fn from_storage(micros: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
}

#[cfg(feature = "sqlx")]
pub(crate) fn decode_column(row: &sqlx::sqlite::SqliteRow, column: &str) -> sqlx::Result<DateTime<Utc>> {
    use sqlx::Row;

    let micros: i64 = row.try_get(column)?;
    from_storage(micros).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("timestamp {micros} is out of range").into(),
    })
}
