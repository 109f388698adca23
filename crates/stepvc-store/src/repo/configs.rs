use super::{json_column, to_json, SqliteRepo};
use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension};
use stepvc_core::model::ProjectConfig;

impl SqliteRepo {
    /// Upsert the single config record of a project
    pub fn put_config(conn: &Connection, config: &ProjectConfig) -> Result<()> {
        conn.execute(
            "INSERT INTO configs (project_id, config) VALUES (?1, ?2)
             ON CONFLICT(project_id) DO UPDATE SET config = excluded.config",
            rusqlite::params![config.project_id, to_json("configs.config", config)?],
        )
        .map_err(from_rusqlite)?;

        tracing::debug!(project_id = %config.project_id, "Stored project config");
        Ok(())
    }

    pub fn get_config(conn: &Connection, project_id: &str) -> Result<Option<ProjectConfig>> {
        conn.query_row(
            "SELECT config FROM configs WHERE project_id = ?",
            [project_id],
            |row| json_column(row, 0),
        )
        .optional()
        .map_err(from_rusqlite)
    }
}
