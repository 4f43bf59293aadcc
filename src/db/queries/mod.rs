//! Entity store queries, one module per collection.

pub mod completions;
pub mod expenses;
pub mod groceries;
pub mod trackables;

use crate::errors::AppError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;

/// Timestamps are stored as RFC 3339 text with millisecond precision.
pub fn ts_to_db(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn opt_ts_to_db(ts: &Option<DateTime<Utc>>) -> Option<String> {
    ts.as_ref().map(ts_to_db)
}

pub fn ts_from_db(raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                Type::Text,
                Box::new(AppError::InvalidDate(raw.clone())),
            )
        })
}

pub fn opt_ts_from_db(raw: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    raw.map(ts_from_db).transpose()
}

pub(crate) fn invalid_text(what: &str, raw: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        Type::Text,
        Box::new(AppError::Other(format!("Invalid {}: {}", what, raw))),
    )
}

/// Collect a `query_map` iterator, stopping at the first row error.
pub(crate) fn collect_rows<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> rusqlite::Result<Vec<T>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
