use super::{from_millis, to_millis, SqliteRepo};
use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use stepvc_core::model::Branch;

const BRANCH_COLUMNS: &str = "id, project_id, name, current_commit, created_at, is_active";

fn branch_from_row(row: &Row<'_>) -> rusqlite::Result<Branch> {
    let is_active: i64 = row.get(5)?;
    Ok(Branch {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        current_commit: row.get(3)?,
        created_at: from_millis(row.get(4)?),
        is_active: is_active != 0,
    })
}

impl SqliteRepo {
    /// Insert a branch; a duplicate id or `(project_id, name)` is `AlreadyExists`
    pub fn insert_branch(conn: &Connection, branch: &Branch) -> Result<()> {
        conn.execute(
            "INSERT INTO branches (id, project_id, name, current_commit, created_at, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                branch.id,
                branch.project_id,
                branch.name,
                branch.current_commit,
                to_millis(&branch.created_at),
                branch.is_active as i64,
            ],
        )
        .map_err(from_rusqlite)?;

        tracing::debug!(branch_id = %branch.id, name = %branch.name, "Inserted branch");
        Ok(())
    }

    pub fn get_branch(conn: &Connection, branch_id: &str) -> Result<Option<Branch>> {
        conn.query_row(
            &format!("SELECT {} FROM branches WHERE id = ?", BRANCH_COLUMNS),
            [branch_id],
            branch_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn get_branch_by_name(
        conn: &Connection,
        project_id: &str,
        name: &str,
    ) -> Result<Option<Branch>> {
        conn.query_row(
            &format!(
                "SELECT {} FROM branches WHERE project_id = ?1 AND name = ?2",
                BRANCH_COLUMNS
            ),
            [project_id, name],
            branch_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// The branch flagged active for a project, if any
    pub fn get_active_branch(conn: &Connection, project_id: &str) -> Result<Option<Branch>> {
        conn.query_row(
            &format!(
                "SELECT {} FROM branches WHERE project_id = ? AND is_active = 1
                 ORDER BY rowid LIMIT 1",
                BRANCH_COLUMNS
            ),
            [project_id],
            branch_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Branches of a project in creation order
    pub fn list_branches(conn: &Connection, project_id: &str) -> Result<Vec<Branch>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM branches WHERE project_id = ? ORDER BY created_at, rowid",
                BRANCH_COLUMNS
            ))
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map([project_id], branch_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(rows)
    }

    /// Move a branch head; returns whether the branch exists
    pub fn set_branch_head(conn: &Connection, branch_id: &str, commit_id: &str) -> Result<bool> {
        let n = conn
            .execute(
                "UPDATE branches SET current_commit = ?1 WHERE id = ?2",
                [commit_id, branch_id],
            )
            .map_err(from_rusqlite)?;
        Ok(n > 0)
    }

    /// Mark `branch_id` active and every sibling inactive
    ///
    /// Two statements; callers wanting atomicity run this inside a
    /// transaction.
    pub fn set_active_branch(conn: &Connection, project_id: &str, branch_id: &str) -> Result<()> {
        conn.execute(
            "UPDATE branches SET is_active = 0 WHERE project_id = ?1 AND id != ?2",
            [project_id, branch_id],
        )
        .map_err(from_rusqlite)?;
        conn.execute(
            "UPDATE branches SET is_active = 1 WHERE project_id = ?1 AND id = ?2",
            [project_id, branch_id],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn delete_branch(conn: &Connection, branch_id: &str) -> Result<bool> {
        let n = conn
            .execute("DELETE FROM branches WHERE id = ?", [branch_id])
            .map_err(from_rusqlite)?;
        Ok(n > 0)
    }
}
