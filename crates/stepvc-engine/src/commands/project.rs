//! Project initialisation and configuration.

use super::{emit, instrumented, require_config};
use rusqlite::Connection;
use stepvc_core::events::{EventBus, EventKind};
use stepvc_core::model::{Branch, ProjectConfig, ProjectConfigOverrides};
use stepvc_core_types::{new_id, RecordKind};
use stepvc_store::errors::{from_rusqlite, Result};
use stepvc_store::SqliteRepo;

/// Create or refresh a project's config and make sure its default branch
/// exists
///
/// Re-initialising an existing project applies `overrides` on top of the
/// stored config. The default branch is created unborn and active when the
/// project has no branches yet.
pub fn init_project(
    conn: &mut Connection,
    events: &EventBus,
    project_id: &str,
    overrides: &ProjectConfigOverrides,
) -> Result<ProjectConfig> {
    instrumented("init_project", || {
        let current =
            SqliteRepo::get_config(conn, project_id)?.unwrap_or_else(|| ProjectConfig::new(project_id));
        let config = current.apply(overrides);

        let tx = conn.transaction().map_err(from_rusqlite)?;
        SqliteRepo::put_config(&tx, &config)?;

        let mut created = None;
        if SqliteRepo::list_branches(&tx, project_id)?.is_empty() {
            let mut branch = Branch::new(
                new_id(RecordKind::Branch),
                project_id.to_string(),
                config.default_branch.clone(),
                String::new(),
            );
            branch.is_active = true;
            SqliteRepo::insert_branch(&tx, &branch)?;
            created = Some(branch);
        }
        tx.commit().map_err(from_rusqlite)?;

        if let Some(branch) = created {
            tracing::info!(project_id, branch = %branch.name, "Created default branch");
            emit(events, EventKind::BranchCreated, project_id, &branch);
        }
        Ok(config)
    })
}

/// Stored config of an initialised project
pub fn get_config(conn: &Connection, project_id: &str) -> Result<ProjectConfig> {
    require_config(conn, project_id)
}

/// Apply overrides to an initialised project's config
pub fn update_config(
    conn: &Connection,
    project_id: &str,
    overrides: &ProjectConfigOverrides,
) -> Result<ProjectConfig> {
    instrumented("update_config", || {
        let config = require_config(conn, project_id)?.apply(overrides);
        SqliteRepo::put_config(conn, &config)?;
        Ok(config)
    })
}
