use super::{bad_label, from_millis, to_millis, SqliteRepo};
use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use stepvc_core::model::{Tag, TagType};

const TAG_COLUMNS: &str = "id, project_id, name, commit_id, tag_type, message, author, created_at";

fn tag_from_row(row: &Row<'_>) -> rusqlite::Result<Tag> {
    let label: String = row.get(4)?;
    let tag_type = TagType::parse(&label).ok_or_else(|| bad_label(4, &label))?;
    Ok(Tag {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        commit_id: row.get(3)?,
        tag_type,
        message: row.get(5)?,
        author: row.get(6)?,
        created_at: from_millis(row.get(7)?),
    })
}

impl SqliteRepo {
    pub fn insert_tag(conn: &Connection, tag: &Tag) -> Result<()> {
        conn.execute(
            "INSERT INTO tags (id, project_id, name, commit_id, tag_type, message, author, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                tag.id,
                tag.project_id,
                tag.name,
                tag.commit_id,
                tag.tag_type.as_str(),
                tag.message,
                tag.author,
                to_millis(&tag.created_at),
            ],
        )
        .map_err(from_rusqlite)?;

        tracing::debug!(tag_id = %tag.id, name = %tag.name, "Inserted tag");
        Ok(())
    }

    pub fn get_tag(conn: &Connection, tag_id: &str) -> Result<Option<Tag>> {
        conn.query_row(
            &format!("SELECT {} FROM tags WHERE id = ?", TAG_COLUMNS),
            [tag_id],
            tag_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn get_tag_by_name(conn: &Connection, project_id: &str, name: &str) -> Result<Option<Tag>> {
        conn.query_row(
            &format!(
                "SELECT {} FROM tags WHERE project_id = ?1 AND name = ?2",
                TAG_COLUMNS
            ),
            [project_id, name],
            tag_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Tags of a project, newest first
    pub fn list_tags(conn: &Connection, project_id: &str) -> Result<Vec<Tag>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM tags WHERE project_id = ? ORDER BY created_at DESC, rowid DESC",
                TAG_COLUMNS
            ))
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map([project_id], tag_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(rows)
    }

    pub fn delete_tag(conn: &Connection, tag_id: &str) -> Result<bool> {
        let n = conn
            .execute("DELETE FROM tags WHERE id = ?", [tag_id])
            .map_err(from_rusqlite)?;
        Ok(n > 0)
    }
}
