use super::{from_millis, json_column, to_json, to_millis, SqliteRepo};
use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use stepvc_core::ancestry::{CommitSource, ParentLookup};
use stepvc_core::errors::ExError;
use stepvc_core::model::Commit;

const COMMIT_COLUMNS: &str = "id, project_id, branch_id, message, author, timestamp, \
                              snapshot_id, parent_id, merge_parent_id, changes, stats";

fn commit_from_row(row: &Row<'_>) -> rusqlite::Result<Commit> {
    Ok(Commit {
        id: row.get(0)?,
        project_id: row.get(1)?,
        branch_id: row.get(2)?,
        message: row.get(3)?,
        author: row.get(4)?,
        timestamp: from_millis(row.get(5)?),
        snapshot_id: row.get(6)?,
        parent_id: row.get(7)?,
        merge_parent_id: row.get(8)?,
        changes: json_column(row, 9)?,
        stats: json_column(row, 10)?,
    })
}

impl SqliteRepo {
    /// Insert a commit; its snapshot must already exist
    pub fn insert_commit(conn: &Connection, commit: &Commit) -> Result<()> {
        conn.execute(
            "INSERT INTO commits (id, project_id, branch_id, message, author, timestamp,
                                  snapshot_id, parent_id, merge_parent_id, changes, stats)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                commit.id,
                commit.project_id,
                commit.branch_id,
                commit.message,
                commit.author,
                to_millis(&commit.timestamp),
                commit.snapshot_id,
                commit.parent_id,
                commit.merge_parent_id,
                to_json("commits.changes", &commit.changes)?,
                to_json("commits.stats", &commit.stats)?,
            ],
        )
        .map_err(from_rusqlite)?;

        tracing::debug!(commit_id = %commit.id, branch_id = %commit.branch_id, "Inserted commit");
        Ok(())
    }

    pub fn get_commit(conn: &Connection, commit_id: &str) -> Result<Option<Commit>> {
        conn.query_row(
            &format!("SELECT {} FROM commits WHERE id = ?", COMMIT_COLUMNS),
            [commit_id],
            commit_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Parent link only, without decoding the change list
    ///
    /// Outer `None` means the commit does not exist.
    pub fn get_commit_parent(conn: &Connection, commit_id: &str) -> Result<Option<Option<String>>> {
        conn.query_row(
            "SELECT parent_id FROM commits WHERE id = ?",
            [commit_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Commits of a project, newest first
    pub fn list_commits(conn: &Connection, project_id: &str) -> Result<Vec<Commit>> {
        Self::query_commits(
            conn,
            "WHERE project_id = ? ORDER BY timestamp DESC, rowid DESC",
            project_id,
        )
    }

    /// Commits recorded on one branch, newest first
    pub fn list_commits_for_branch(conn: &Connection, branch_id: &str) -> Result<Vec<Commit>> {
        Self::query_commits(
            conn,
            "WHERE branch_id = ? ORDER BY timestamp DESC, rowid DESC",
            branch_id,
        )
    }

    fn query_commits(conn: &Connection, clause: &str, key: &str) -> Result<Vec<Commit>> {
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM commits {}", COMMIT_COLUMNS, clause))
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map([key], commit_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(rows)
    }

    /// Delete a commit; returns whether a row was removed
    pub fn delete_commit(conn: &Connection, commit_id: &str) -> Result<bool> {
        let n = conn
            .execute("DELETE FROM commits WHERE id = ?", [commit_id])
            .map_err(from_rusqlite)?;
        Ok(n > 0)
    }
}

/// Ancestry lookups served straight from the commits table
pub struct SqliteCommitSource<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteCommitSource<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl CommitSource for SqliteCommitSource<'_> {
    type Error = ExError;

    fn parent_of(&self, commit_id: &str) -> Result<ParentLookup> {
        Ok(match SqliteRepo::get_commit_parent(self.conn, commit_id)? {
            Some(parent) => ParentLookup::Found(parent),
            None => ParentLookup::Missing,
        })
    }
}
