//! Branch lifecycle: create, switch, delete, list.

use super::{emit, instrumented, invalid_input, require_commit, require_project_branch};
use rusqlite::Connection;
use stepvc_core::errors::VcsError;
use stepvc_core::events::{EventBus, EventKind};
use stepvc_core::model::Branch;
use stepvc_core_types::{new_id, RecordKind};
use stepvc_store::errors::{from_rusqlite, Result};
use stepvc_store::SqliteRepo;

/// Create a branch
///
/// `from_commit` pins the new head; `None` starts from the active branch's
/// head, or unborn when there is no active branch or it has no commits. The
/// first branch of a project becomes the active one.
pub fn create_branch(
    conn: &mut Connection,
    events: &EventBus,
    project_id: &str,
    name: &str,
    from_commit: Option<&str>,
) -> Result<Branch> {
    instrumented("create_branch", || {
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid_input("Branch name cannot be empty").with_project_id(project_id));
        }

        let head = match from_commit {
            Some(commit_id) => {
                let commit = require_commit(conn, commit_id)?;
                if commit.project_id != project_id {
                    return Err(VcsError::CommitNotFound {
                        commit_id: commit_id.to_string(),
                    }
                    .into());
                }
                commit.id
            }
            None => SqliteRepo::get_active_branch(conn, project_id)?
                .map(|b| b.current_commit)
                .unwrap_or_default(),
        };

        let mut branch = Branch::new(
            new_id(RecordKind::Branch),
            project_id.to_string(),
            name.to_string(),
            head,
        );

        let tx = conn.transaction().map_err(from_rusqlite)?;
        branch.is_active = SqliteRepo::list_branches(&tx, project_id)?.is_empty();
        SqliteRepo::insert_branch(&tx, &branch).map_err(|e| e.with_entity_id(name))?;
        tx.commit().map_err(from_rusqlite)?;

        emit(events, EventKind::BranchCreated, project_id, &branch);
        Ok(branch)
    })
}

/// Make `branch_id` the only active branch of its project
pub fn switch_branch(
    conn: &mut Connection,
    events: &EventBus,
    project_id: &str,
    branch_id: &str,
) -> Result<Branch> {
    instrumented("switch_branch", || {
        let mut branch = require_project_branch(conn, project_id, branch_id)?;

        let tx = conn.transaction().map_err(from_rusqlite)?;
        SqliteRepo::set_active_branch(&tx, project_id, branch_id)?;
        tx.commit().map_err(from_rusqlite)?;

        branch.is_active = true;
        emit(events, EventKind::BranchSwitched, project_id, &branch);
        Ok(branch)
    })
}

/// Delete a branch pointer; its commits stay in history
pub fn delete_branch(conn: &Connection, project_id: &str, branch_id: &str) -> Result<()> {
    instrumented("delete_branch", || {
        let branch = require_project_branch(conn, project_id, branch_id)?;
        if branch.is_active {
            return Err(invalid_input("Cannot delete the active branch")
                .with_entity_id(branch_id)
                .with_project_id(project_id));
        }
        SqliteRepo::delete_branch(conn, branch_id)?;
        Ok(())
    })
}

pub fn get_branches(conn: &Connection, project_id: &str) -> Result<Vec<Branch>> {
    SqliteRepo::list_branches(conn, project_id)
}

pub fn get_branch(conn: &Connection, project_id: &str, branch_id: &str) -> Result<Branch> {
    require_project_branch(conn, project_id, branch_id)
}

pub fn get_branch_by_name(conn: &Connection, project_id: &str, name: &str) -> Result<Branch> {
    SqliteRepo::get_branch_by_name(conn, project_id, name)?.ok_or_else(|| {
        VcsError::BranchNotFound {
            branch: name.to_string(),
        }
        .into()
    })
}

pub fn get_active_branch(conn: &Connection, project_id: &str) -> Result<Option<Branch>> {
    SqliteRepo::get_active_branch(conn, project_id)
}
