//! Opening and configuring SQLite connections

use std::path::Path;

use rusqlite::Connection;

use crate::errors::{from_rusqlite, store_unavailable, Result};

/// Open (or create) the store file at `path`
///
/// The parent directory must already exist.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let path = path.as_ref();
    Connection::open(path)
        .map_err(|e| store_unavailable(format!("cannot open {}: {}", path.display(), e)))
}

/// Private in-memory store; gone when the connection drops
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(|e| store_unavailable(e.to_string()))
}

/// Turn on foreign keys and ask for WAL
///
/// Commit parents, branch heads and tags reference each other, so foreign
/// keys must be enforced on every connection. In-memory databases answer
/// `memory` to the WAL request, which is fine.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(from_rusqlite)?;
    let journal: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(from_rusqlite)?;
    tracing::debug!(journal_mode = %journal, "store connection ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepvc_core::errors::ExErrorKind;

    #[test]
    fn test_foreign_keys_on_after_configure() {
        let conn = open_in_memory().unwrap();
        configure(&conn).unwrap();
        let enforced: bool = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert!(enforced);
    }

    #[test]
    fn test_wal_on_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open(dir.path().join("store.db")).unwrap();
        configure(&conn).unwrap();
        let journal: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(journal.to_lowercase(), "wal");
    }

    #[test]
    fn test_missing_directory_is_unavailable() {
        let err = open("/nonexistent-stepvc-dir/sub/store.db").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::StoreUnavailable);
    }
}
