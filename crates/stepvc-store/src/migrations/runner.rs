use rusqlite::{params, Connection, OptionalExtension};

use super::catalog::{Migration, MIGRATIONS};
use crate::errors::{from_rusqlite, migration_failed, migration_gap, migration_tampered, Result};

/// Ledger of applied migrations
pub const LEDGER_TABLE: &str = "schema_version";

/// What one `apply_migrations` call did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Applied by this call
    pub applied: Vec<&'static str>,
    /// Already present with a matching checksum
    pub already_applied: Vec<&'static str>,
}

/// Bring the schema up to date
///
/// Each pending migration runs in its own transaction together with its
/// ledger row, so a failure leaves earlier migrations committed and the
/// failing one absent.
///
/// # Errors
///
/// `Persistence` when a migration's SQL fails, when a recorded checksum no
/// longer matches the compiled-in SQL, or when the ledger has a gap (an
/// unrecorded migration older than a recorded one).
pub fn apply_migrations(conn: &mut Connection) -> Result<MigrationReport> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {LEDGER_TABLE} (
            id INTEGER PRIMARY KEY,
            migration_id TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL,
            checksum TEXT
        );"
    ))
    .map_err(from_rusqlite)?;

    check_for_gap(conn)?;

    let mut report = MigrationReport::default();
    for migration in MIGRATIONS {
        let expected = migration.checksum();
        match recorded_checksum(conn, migration.id)? {
            Some(Some(found)) if found != expected => {
                return Err(migration_tampered(migration.id, &found, &expected));
            }
            Some(_) => report.already_applied.push(migration.id),
            None => {
                run(conn, migration, &expected)?;
                report.applied.push(migration.id);
            }
        }
    }

    if !report.applied.is_empty() {
        tracing::info!(applied = ?report.applied, "schema migrated");
    }
    Ok(report)
}

/// Ids recorded in the ledger, in application order
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(&format!("SELECT migration_id FROM {LEDGER_TABLE} ORDER BY id"))
        .map_err(from_rusqlite)?;
    let ids = stmt
        .query_map([], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(from_rusqlite)?;
    Ok(ids)
}

fn check_for_gap(conn: &Connection) -> Result<()> {
    let recorded = applied_migrations(conn)?;
    let newest = MIGRATIONS
        .iter()
        .rposition(|m| recorded.iter().any(|r| r == m.id));
    let Some(newest) = newest else {
        return Ok(());
    };
    match MIGRATIONS[..newest]
        .iter()
        .find(|m| !recorded.iter().any(|r| r == m.id))
    {
        Some(missing) => Err(migration_gap(missing.id, MIGRATIONS[newest].id)),
        None => Ok(()),
    }
}

fn recorded_checksum(conn: &Connection, id: &str) -> Result<Option<Option<String>>> {
    conn.query_row(
        &format!("SELECT checksum FROM {LEDGER_TABLE} WHERE migration_id = ?1"),
        [id],
        |row| row.get(0),
    )
    .optional()
    .map_err(from_rusqlite)
}

fn run(conn: &mut Connection, migration: &Migration, checksum: &str) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    tx.execute_batch(migration.sql)
        .map_err(|e| migration_failed(migration.id, e))?;
    tx.execute(
        &format!(
            "INSERT INTO {LEDGER_TABLE} (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)"
        ),
        params![migration.id, chrono::Utc::now().timestamp(), checksum],
    )
    .map_err(from_rusqlite)?;
    tx.commit().map_err(from_rusqlite)?;
    tracing::debug!(migration_id = migration.id, "migration applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_run_applies_nothing() {
        let mut conn = Connection::open_in_memory().unwrap();
        let first = apply_migrations(&mut conn).unwrap();
        assert_eq!(first.applied.len(), MIGRATIONS.len());

        let second = apply_migrations(&mut conn).unwrap();
        assert!(second.applied.is_empty());
        assert_eq!(second.already_applied.len(), MIGRATIONS.len());
    }

    #[test]
    fn test_ledger_lists_in_order() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        let ids = applied_migrations(&conn).unwrap();
        let expected: Vec<String> = MIGRATIONS.iter().map(|m| m.id.to_string()).collect();
        assert_eq!(ids, expected);
    }
}
