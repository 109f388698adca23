use super::{from_millis, json_column, to_json, to_millis, SqliteRepo};
use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use stepvc_core::model::Snapshot;

const SNAPSHOT_COLUMNS: &str = "id, project_id, timestamp, message, author, data, parent";

fn snapshot_from_row(row: &Row<'_>) -> rusqlite::Result<Snapshot> {
    Ok(Snapshot {
        id: row.get(0)?,
        project_id: row.get(1)?,
        timestamp: from_millis(row.get(2)?),
        message: row.get(3)?,
        author: row.get(4)?,
        data: json_column(row, 5)?,
        parent: row.get(6)?,
    })
}

impl SqliteRepo {
    /// Insert a snapshot; a duplicate id is `AlreadyExists`
    pub fn insert_snapshot(conn: &Connection, snapshot: &Snapshot) -> Result<()> {
        conn.execute(
            "INSERT INTO snapshots (id, project_id, timestamp, message, author, data, parent)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                snapshot.id,
                snapshot.project_id,
                to_millis(&snapshot.timestamp),
                snapshot.message,
                snapshot.author,
                to_json("snapshots.data", &snapshot.data)?,
                snapshot.parent,
            ],
        )
        .map_err(from_rusqlite)?;

        tracing::debug!(snapshot_id = %snapshot.id, "Inserted snapshot");
        Ok(())
    }

    pub fn get_snapshot(conn: &Connection, snapshot_id: &str) -> Result<Option<Snapshot>> {
        conn.query_row(
            &format!("SELECT {} FROM snapshots WHERE id = ?", SNAPSHOT_COLUMNS),
            [snapshot_id],
            snapshot_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// All snapshots of a project, oldest first
    pub fn list_snapshots(conn: &Connection, project_id: &str) -> Result<Vec<Snapshot>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM snapshots WHERE project_id = ? ORDER BY timestamp, rowid",
                SNAPSHOT_COLUMNS
            ))
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map([project_id], snapshot_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(rows)
    }

    /// Delete a snapshot; returns whether a row was removed
    pub fn delete_snapshot(conn: &Connection, snapshot_id: &str) -> Result<bool> {
        let n = conn
            .execute("DELETE FROM snapshots WHERE id = ?", [snapshot_id])
            .map_err(from_rusqlite)?;
        Ok(n > 0)
    }
}
