//! Single-path restore from an older commit.

use super::commit::{record_commit, NewCommit};
use super::{
    commit_data, default_author, head_data, instrumented, require_commit, require_project_branch,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stepvc_core::errors::VcsError;
use stepvc_core::events::EventBus;
use stepvc_core::model::{Branch, Commit, ProjectData};
use stepvc_core::path::{delete_path, get_path, set_path, ValuePath};
use stepvc_store::errors::Result;

/// What a restore would change at one path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestorePreview {
    pub path: String,
    pub commit_id: String,
    /// Value at `path` in the historical commit (None if absent)
    pub historical: Option<Value>,
    /// Value at `path` on the branch head (None if absent)
    pub current: Option<Value>,
}

impl RestorePreview {
    /// True when restoring would change nothing
    pub fn is_noop(&self) -> bool {
        self.historical == self.current
    }
}

struct Loaded {
    branch: Branch,
    current: Value,
    preview: RestorePreview,
}

fn load(
    conn: &Connection,
    project_id: &str,
    branch_id: &str,
    path: &ValuePath,
    commit_id: &str,
) -> Result<Loaded> {
    let branch = require_project_branch(conn, project_id, branch_id)?;
    let historical = commit_data(conn, &require_commit(conn, commit_id)?)?
        .to_value()
        .map_err(VcsError::from)?;
    let current = head_data(conn, &branch)?
        .to_value()
        .map_err(VcsError::from)?;

    let preview = RestorePreview {
        path: path.to_string(),
        commit_id: commit_id.to_string(),
        historical: get_path(&historical, path).cloned(),
        current: get_path(&current, path).cloned(),
    };
    Ok(Loaded {
        branch,
        current,
        preview,
    })
}

/// Read the value at `path` from `commit_id` alongside the branch head's value
pub fn preview_restore_from_commit(
    conn: &Connection,
    project_id: &str,
    branch_id: &str,
    path: &str,
    commit_id: &str,
) -> Result<RestorePreview> {
    let path = ValuePath::parse(path)?;
    Ok(load(conn, project_id, branch_id, &path, commit_id)?.preview)
}

/// Copy the value at `path` from `commit_id` onto the branch head and commit
///
/// Only that path is written. If the path was absent in the historical
/// commit it is deleted from the head.
pub fn restore_path_from_commit(
    conn: &mut Connection,
    events: &EventBus,
    project_id: &str,
    branch_id: &str,
    path: &str,
    commit_id: &str,
) -> Result<Commit> {
    instrumented("restore_path_from_commit", || {
        let parsed = ValuePath::parse(path)?;
        let Loaded {
            branch,
            mut current,
            preview,
        } = load(conn, project_id, branch_id, &parsed, commit_id)?;

        match preview.historical {
            Some(value) => set_path(&mut current, &parsed, value)?,
            None => {
                delete_path(&mut current, &parsed);
            }
        }
        let restored = ProjectData::from_value(current).map_err(VcsError::from)?;

        let author = default_author(conn, project_id)?;
        record_commit(
            conn,
            events,
            NewCommit {
                branch: &branch,
                message: format!("Restore {} from {}", parsed, commit_id),
                author,
                data: &restored,
                merge_parent_id: None,
                expected_head: None,
            },
        )
    })
}
