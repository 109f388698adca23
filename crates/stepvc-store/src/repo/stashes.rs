use super::{from_millis, json_column, to_json, to_millis, SqliteRepo};
use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use stepvc_core::model::StashEntry;

const STASH_COLUMNS: &str = "id, project_id, branch_id, message, timestamp, changes";

fn stash_from_row(row: &Row<'_>) -> rusqlite::Result<StashEntry> {
    Ok(StashEntry {
        id: row.get(0)?,
        project_id: row.get(1)?,
        branch_id: row.get(2)?,
        message: row.get(3)?,
        timestamp: from_millis(row.get(4)?),
        changes: json_column(row, 5)?,
    })
}

impl SqliteRepo {
    pub fn insert_stash(conn: &Connection, stash: &StashEntry) -> Result<()> {
        conn.execute(
            "INSERT INTO stashes (id, project_id, branch_id, message, timestamp, changes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                stash.id,
                stash.project_id,
                stash.branch_id,
                stash.message,
                to_millis(&stash.timestamp),
                to_json("stashes.changes", &stash.changes)?,
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn get_stash(conn: &Connection, stash_id: &str) -> Result<Option<StashEntry>> {
        conn.query_row(
            &format!("SELECT {} FROM stashes WHERE id = ?", STASH_COLUMNS),
            [stash_id],
            stash_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Stashes of a project, newest first
    pub fn list_stashes(conn: &Connection, project_id: &str) -> Result<Vec<StashEntry>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM stashes WHERE project_id = ? ORDER BY timestamp DESC, rowid DESC",
                STASH_COLUMNS
            ))
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map([project_id], stash_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(rows)
    }

    pub fn delete_stash(conn: &Connection, stash_id: &str) -> Result<bool> {
        let n = conn
            .execute("DELETE FROM stashes WHERE id = ?", [stash_id])
            .map_err(from_rusqlite)?;
        Ok(n > 0)
    }
}
