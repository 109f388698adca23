//! Repository layer: one module per collection
//!
//! Every function is an associated function on [`SqliteRepo`] taking
//! `&Connection`. A `rusqlite::Transaction` derefs to `Connection`, so the
//! same calls group into a transaction without separate `_tx` variants.
//!
//! Timestamps are stored as Unix milliseconds. JSON payloads are stored as
//! TEXT.

mod branches;
mod commits;
mod configs;
mod merge_requests;
mod snapshots;
mod stashes;
mod tags;

pub use commits::SqliteCommitSource;

use crate::errors::{from_serde, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// SQLite repository for every versioning collection
pub struct SqliteRepo;

pub(crate) fn to_millis(ts: &DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub(crate) fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

pub(crate) fn to_json<T: Serialize + ?Sized>(column: &str, value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| from_serde(column, e))
}

/// Decode a JSON TEXT column inside a row-mapping closure
pub(crate) fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Like [`json_column`] for a nullable column
pub(crate) fn opt_json_column<T: DeserializeOwned>(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        serde_json::from_str(&s)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Error for an enum column holding an unknown label
pub(crate) fn bad_label(idx: usize, label: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        format!("unknown label '{}'", label).into(),
    )
}
