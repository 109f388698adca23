//! Error handling for stepvc-store
//!
//! Wraps stepvc-core ExError with store-specific helpers

use stepvc_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// A migration's SQL failed to run
pub fn migration_failed(migration_id: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_entity_id(migration_id)
        .with_message(format!("Migration {} failed: {}", migration_id, err))
}

/// The ledger holds a different checksum than the compiled-in SQL
pub fn migration_tampered(migration_id: &str, recorded: &str, embedded: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_entity_id(migration_id)
        .with_message(format!(
            "Migration {} was edited after it ran (recorded {}, now {})",
            migration_id, recorded, embedded
        ))
}

/// An older migration is missing from the ledger while a newer one is present
pub fn migration_gap(missing_id: &str, newer_id: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_gap")
        .with_entity_id(missing_id)
        .with_message(format!(
            "Migration {} is not recorded but later migration {} is",
            missing_id, newer_id
        ))
}

/// Create a database error from rusqlite::Error
///
/// Primary-key and unique violations surface as `AlreadyExists`; every other
/// failure is `Persistence`.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    if let rusqlite::Error::SqliteFailure(ref failure, _) = err {
        let duplicate = failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE;
        if duplicate {
            return ExError::new(ExErrorKind::AlreadyExists)
                .with_op("sqlite")
                .with_message(err.to_string());
        }
    }
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a serialization error for a JSON column
pub fn from_serde(column: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("json_column")
        .with_message(format!("Column {}: {}", column, err))
}

/// Error for a connection that could not be opened or configured
pub fn store_unavailable(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::StoreUnavailable)
        .with_op("open_store")
        .with_message(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unique_violation_maps_to_already_exists() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id TEXT PRIMARY KEY); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .map_err(from_rusqlite)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
    }

    #[test]
    fn test_other_failures_are_persistence() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn
            .execute("SELECT * FROM missing_table", [])
            .map_err(from_rusqlite)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Persistence);
    }
}
