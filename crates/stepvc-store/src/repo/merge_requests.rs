use super::{bad_label, from_millis, opt_json_column, to_json, to_millis, SqliteRepo};
use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use stepvc_core::model::{MergeRequest, MergeRequestStatus};

const MR_COLUMNS: &str = "id, project_id, source_branch, target_branch, title, description, \
                          author, status, conflicts, created_at, updated_at";

fn merge_request_from_row(row: &Row<'_>) -> rusqlite::Result<MergeRequest> {
    let label: String = row.get(7)?;
    let status = MergeRequestStatus::parse(&label).ok_or_else(|| bad_label(7, &label))?;
    Ok(MergeRequest {
        id: row.get(0)?,
        project_id: row.get(1)?,
        source_branch: row.get(2)?,
        target_branch: row.get(3)?,
        title: row.get(4)?,
        description: row.get(5)?,
        author: row.get(6)?,
        status,
        conflicts: opt_json_column(row, 8)?,
        created_at: from_millis(row.get(9)?),
        updated_at: from_millis(row.get(10)?),
    })
}

impl SqliteRepo {
    pub fn insert_merge_request(conn: &Connection, mr: &MergeRequest) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO merge_requests ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                MR_COLUMNS
            ),
            rusqlite::params![
                mr.id,
                mr.project_id,
                mr.source_branch,
                mr.target_branch,
                mr.title,
                mr.description,
                mr.author,
                mr.status.as_str(),
                mr.conflicts
                    .as_ref()
                    .map(|c| to_json("merge_requests.conflicts", c))
                    .transpose()?,
                to_millis(&mr.created_at),
                to_millis(&mr.updated_at),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Overwrite the mutable fields of an existing request
    pub fn put_merge_request(conn: &Connection, mr: &MergeRequest) -> Result<bool> {
        let n = conn
            .execute(
                "UPDATE merge_requests
                 SET title = ?2, description = ?3, status = ?4, conflicts = ?5, updated_at = ?6
                 WHERE id = ?1",
                rusqlite::params![
                    mr.id,
                    mr.title,
                    mr.description,
                    mr.status.as_str(),
                    mr.conflicts
                        .as_ref()
                        .map(|c| to_json("merge_requests.conflicts", c))
                        .transpose()?,
                    to_millis(&mr.updated_at),
                ],
            )
            .map_err(from_rusqlite)?;
        Ok(n > 0)
    }

    pub fn get_merge_request(conn: &Connection, id: &str) -> Result<Option<MergeRequest>> {
        conn.query_row(
            &format!("SELECT {} FROM merge_requests WHERE id = ?", MR_COLUMNS),
            [id],
            merge_request_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Requests of a project, newest first, optionally filtered by status
    pub fn list_merge_requests(
        conn: &Connection,
        project_id: &str,
        status: Option<MergeRequestStatus>,
    ) -> Result<Vec<MergeRequest>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM merge_requests
                 WHERE project_id = ?1 AND (?2 IS NULL OR status = ?2)
                 ORDER BY created_at DESC, rowid DESC",
                MR_COLUMNS
            ))
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map(
                rusqlite::params![project_id, status.map(|s| s.as_str())],
                merge_request_from_row,
            )
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(rows)
    }
}
