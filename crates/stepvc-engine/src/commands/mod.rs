//! Command orchestration layer.
//!
//! Every command reads current state fresh from the store; nothing is cached
//! between calls. Multi-record writes run in a single transaction.

pub mod branch;
pub mod cleanup;
pub mod commit;
pub mod merge;
pub mod merge_request;
pub mod project;
pub mod restore;
pub mod stash;
pub mod tag;

use rusqlite::Connection;
use serde::Serialize;
use std::time::Instant;
use stepvc_core::errors::{ExError, ExErrorKind, VcsError};
use stepvc_core::events::{EventBus, EventKind, VersionEvent};
use stepvc_core::model::{Branch, Commit, ProjectConfig, ProjectData};
use stepvc_store::errors::Result;
use stepvc_store::SqliteRepo;

/// Bracket a command with start/end logging and tag its error with `op`
pub(crate) fn instrumented<T>(op: &'static str, body: impl FnOnce() -> Result<T>) -> Result<T> {
    let start = Instant::now();
    stepvc_core::log_op_start!(op);

    let result = body();
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(value) => {
            stepvc_core::log_op_end!(op, duration_ms = duration_ms);
            Ok(value)
        }
        Err(e) => {
            let e = if e.op().is_none() { e.with_op(op) } else { e };
            stepvc_core::log_op_error!(op, e.clone(), duration_ms = duration_ms);
            Err(e)
        }
    }
}

/// Best-effort event emission; an unserializable payload becomes null
pub(crate) fn emit<T: Serialize>(events: &EventBus, kind: EventKind, project_id: &str, record: &T) {
    let payload = serde_json::to_value(record).unwrap_or_default();
    events.emit(&VersionEvent::new(kind, project_id, payload));
}

pub(crate) fn require_config(conn: &Connection, project_id: &str) -> Result<ProjectConfig> {
    SqliteRepo::get_config(conn, project_id)?.ok_or_else(|| {
        VcsError::ProjectNotInitialized {
            project_id: project_id.to_string(),
        }
        .into()
    })
}

/// Configured author, or the default when the project has no config yet
pub(crate) fn default_author(conn: &Connection, project_id: &str) -> Result<String> {
    Ok(SqliteRepo::get_config(conn, project_id)?
        .map(|c| c.author)
        .unwrap_or_else(|| ProjectConfig::DEFAULT_AUTHOR.to_string()))
}

pub(crate) fn require_branch(conn: &Connection, branch_id: &str) -> Result<Branch> {
    SqliteRepo::get_branch(conn, branch_id)?.ok_or_else(|| {
        VcsError::BranchNotFound {
            branch: branch_id.to_string(),
        }
        .into()
    })
}

/// Branch lookup that also checks project ownership
pub(crate) fn require_project_branch(
    conn: &Connection,
    project_id: &str,
    branch_id: &str,
) -> Result<Branch> {
    let branch = require_branch(conn, branch_id)?;
    if branch.project_id != project_id {
        return Err(ExError::from(VcsError::BranchNotFound {
            branch: branch_id.to_string(),
        })
        .with_project_id(project_id));
    }
    Ok(branch)
}

pub(crate) fn require_commit(conn: &Connection, commit_id: &str) -> Result<Commit> {
    SqliteRepo::get_commit(conn, commit_id)?.ok_or_else(|| {
        VcsError::CommitNotFound {
            commit_id: commit_id.to_string(),
        }
        .into()
    })
}

/// Project data captured by a commit
pub(crate) fn commit_data(conn: &Connection, commit: &Commit) -> Result<ProjectData> {
    let snapshot = SqliteRepo::get_snapshot(conn, &commit.snapshot_id)?.ok_or_else(|| {
        ExError::from(VcsError::SnapshotNotFound {
            snapshot_id: commit.snapshot_id.clone(),
        })
        .with_message(format!(
            "Snapshot {} of commit {} is missing",
            commit.snapshot_id, commit.id
        ))
    })?;
    Ok(snapshot.data)
}

/// Data at a branch head; an unborn branch reads as an empty document
pub(crate) fn head_data(conn: &Connection, branch: &Branch) -> Result<ProjectData> {
    match branch.head() {
        Some(head) => commit_data(conn, &require_commit(conn, head)?),
        None => Ok(ProjectData::new()),
    }
}

pub(crate) fn invalid_input(message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput).with_message(message)
}
