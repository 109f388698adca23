//! Stash: park uncommitted work as a change list against a branch head.

use super::{head_data, instrumented, invalid_input, require_branch, require_project_branch};
use rusqlite::Connection;
use stepvc_core::diff::{apply_changes, calculate_changes};
use stepvc_core::errors::VcsError;
use stepvc_core::model::{now_millis, ProjectData, StashEntry};
use stepvc_core_types::{new_id, RecordKind};
use stepvc_store::errors::Result;
use stepvc_store::SqliteRepo;

/// Record the changes from the branch head to `working` as a stash entry
pub fn stash_changes(
    conn: &Connection,
    project_id: &str,
    branch_id: &str,
    working: &ProjectData,
    message: &str,
) -> Result<StashEntry> {
    instrumented("stash_changes", || {
        let branch = require_project_branch(conn, project_id, branch_id)?;
        let changes = calculate_changes(&head_data(conn, &branch)?, working);
        if changes.is_empty() {
            return Err(invalid_input("Nothing to stash: working data matches the branch head")
                .with_entity_id(branch_id));
        }

        let entry = StashEntry {
            id: new_id(RecordKind::Stash),
            project_id: project_id.to_string(),
            branch_id: branch.id,
            message: message.to_string(),
            timestamp: now_millis(),
            changes,
        };
        SqliteRepo::insert_stash(conn, &entry)?;
        Ok(entry)
    })
}

/// Stash entries of a project, newest first
pub fn list_stashes(conn: &Connection, project_id: &str) -> Result<Vec<StashEntry>> {
    SqliteRepo::list_stashes(conn, project_id)
}

fn require_stash(conn: &Connection, stash_id: &str) -> Result<StashEntry> {
    SqliteRepo::get_stash(conn, stash_id)?.ok_or_else(|| {
        VcsError::StashNotFound {
            stash_id: stash_id.to_string(),
        }
        .into()
    })
}

/// Re-apply a stash onto its branch's current head and discard the entry
///
/// Returns the resulting working data; nothing is committed.
pub fn pop_stash(conn: &Connection, stash_id: &str) -> Result<ProjectData> {
    instrumented("pop_stash", || {
        let entry = require_stash(conn, stash_id)?;
        let branch = require_branch(conn, &entry.branch_id)?;
        let data = apply_changes(&head_data(conn, &branch)?, &entry.changes)?;
        SqliteRepo::delete_stash(conn, stash_id)?;
        Ok(data)
    })
}

/// Discard a stash entry without applying it
pub fn drop_stash(conn: &Connection, stash_id: &str) -> Result<()> {
    instrumented("drop_stash", || {
        require_stash(conn, stash_id)?;
        SqliteRepo::delete_stash(conn, stash_id)?;
        Ok(())
    })
}
