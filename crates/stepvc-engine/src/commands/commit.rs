//! Commit creation, rollback and history queries.
//!
//! ## Commit pipeline
//! 1. Resolve the branch (BranchNotFound if absent or in another project)
//! 2. Optional expected-head check (HeadMismatch, nothing written)
//! 3. Diff the prior head's snapshot against the new data
//! 4. Insert snapshot + commit and advance the branch head in one transaction
//! 5. Emit SNAPSHOT_CREATED and COMMIT_CREATED
//!
//! Without `expected_head` two writers that read the same head both commit
//! on top of it and the later head update wins. `expected_head` turns that
//! read-then-write into a compare-and-swap.

use super::{
    commit_data, default_author, emit, instrumented, require_branch, require_commit,
    require_project_branch,
};
use rusqlite::Connection;
use stepvc_core::ancestry::commit_chain;
use stepvc_core::diff::{calculate_changes, compute_stats};
use stepvc_core::errors::VcsError;
use stepvc_core::events::{EventBus, EventKind};
use stepvc_core::model::{now_millis, Branch, Change, Commit, ProjectData, Snapshot};
use stepvc_core_types::{new_id, RecordKind};
use stepvc_store::errors::{from_rusqlite, Result};
use stepvc_store::{SqliteCommitSource, SqliteRepo};

/// Options for a commit.
#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    /// Author override; defaults to the project's configured author
    pub author: Option<String>,
    /// Expected current head of the branch (optimistic concurrency).
    /// `Some("")` expects an unborn branch. If provided and the head differs,
    /// HeadMismatch is returned.
    pub expected_head: Option<String>,
}

impl CommitOptions {
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_expected_head(mut self, head: impl Into<String>) -> Self {
        self.expected_head = Some(head.into());
        self
    }
}

/// Everything needed to write one commit onto a branch
pub(crate) struct NewCommit<'a> {
    pub branch: &'a Branch,
    pub message: String,
    pub author: String,
    pub data: &'a ProjectData,
    pub merge_parent_id: Option<String>,
    pub expected_head: Option<String>,
}

/// Snapshot + commit + head advance, all in one transaction
pub(crate) fn record_commit(
    conn: &mut Connection,
    events: &EventBus,
    new: NewCommit<'_>,
) -> Result<Commit> {
    let branch = new.branch;
    let project_id = branch.project_id.as_str();

    let prior = match branch.head() {
        Some(head) => Some(require_commit(conn, head)?),
        None => None,
    };
    let changes = match &prior {
        Some(prior) => calculate_changes(&commit_data(conn, prior)?, new.data),
        None => Vec::new(),
    };
    let stats = compute_stats(&changes);
    let timestamp = now_millis();

    let snapshot = Snapshot {
        id: new_id(RecordKind::Snapshot),
        project_id: project_id.to_string(),
        timestamp,
        message: new.message.clone(),
        author: new.author.clone(),
        data: new.data.clone(),
        parent: prior.as_ref().map(|c| c.snapshot_id.clone()),
    };
    let commit = Commit {
        id: new_id(RecordKind::Commit),
        project_id: project_id.to_string(),
        branch_id: branch.id.clone(),
        message: new.message,
        author: new.author,
        timestamp,
        snapshot_id: snapshot.id.clone(),
        parent_id: prior.map(|c| c.id),
        merge_parent_id: new.merge_parent_id,
        changes,
        stats,
    };

    let tx = conn.transaction().map_err(from_rusqlite)?;
    if let Some(expected) = &new.expected_head {
        let current = require_branch(&tx, &branch.id)?;
        if &current.current_commit != expected {
            return Err(VcsError::HeadMismatch {
                branch_id: branch.id.clone(),
                expected: expected.clone(),
                actual: current.head().map(str::to_string),
            }
            .into());
        }
    }
    SqliteRepo::insert_snapshot(&tx, &snapshot)?;
    SqliteRepo::insert_commit(&tx, &commit)?;
    SqliteRepo::set_branch_head(&tx, &branch.id, &commit.id)?;
    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(
        commit_id = %commit.id,
        branch_id = %commit.branch_id,
        change_count = commit.changes.len(),
        "Recorded commit"
    );

    emit(events, EventKind::SnapshotCreated, project_id, &snapshot);
    emit(events, EventKind::CommitCreated, project_id, &commit);
    Ok(commit)
}

/// Commit `data` onto a branch
pub fn commit(
    conn: &mut Connection,
    events: &EventBus,
    project_id: &str,
    branch_id: &str,
    message: &str,
    data: &ProjectData,
    options: CommitOptions,
) -> Result<Commit> {
    instrumented("commit", || {
        let branch = require_project_branch(conn, project_id, branch_id)?;
        let author = match options.author {
            Some(author) => author,
            None => default_author(conn, project_id)?,
        };
        record_commit(
            conn,
            events,
            NewCommit {
                branch: &branch,
                message: message.to_string(),
                author,
                data,
                merge_parent_id: None,
                expected_head: options.expected_head,
            },
        )
    })
}

/// Project data exactly as committed by `commit_id`
pub fn rollback(conn: &Connection, commit_id: &str) -> Result<ProjectData> {
    instrumented("rollback", || {
        let commit = require_commit(conn, commit_id)?;
        commit_data(conn, &commit)
    })
}

pub fn get_commit(conn: &Connection, commit_id: &str) -> Result<Commit> {
    require_commit(conn, commit_id)
}

pub fn get_snapshot(conn: &Connection, snapshot_id: &str) -> Result<Snapshot> {
    SqliteRepo::get_snapshot(conn, snapshot_id)?.ok_or_else(|| {
        VcsError::SnapshotNotFound {
            snapshot_id: snapshot_id.to_string(),
        }
        .into()
    })
}

/// Commits of a project, or of one branch, newest first
pub fn get_commits(
    conn: &Connection,
    project_id: &str,
    branch_id: Option<&str>,
) -> Result<Vec<Commit>> {
    match branch_id {
        Some(branch_id) => {
            require_project_branch(conn, project_id, branch_id)?;
            SqliteRepo::list_commits_for_branch(conn, branch_id)
        }
        None => SqliteRepo::list_commits(conn, project_id),
    }
}

/// Lineage of a branch head following parent links, newest first
///
/// Unlike [`get_commits`] this includes commits made on other branches
/// before this one forked, and excludes commits merged in from elsewhere.
pub fn get_history(
    conn: &Connection,
    project_id: &str,
    branch_id: &str,
    limit: Option<usize>,
) -> Result<Vec<Commit>> {
    let branch = require_project_branch(conn, project_id, branch_id)?;
    let head = match branch.head() {
        Some(head) => head,
        None => return Ok(Vec::new()),
    };

    let chain = commit_chain(&SqliteCommitSource::new(conn), head)?;
    let take = limit.unwrap_or(chain.len());

    let mut history = Vec::with_capacity(take.min(chain.len()));
    for id in chain.iter().take(take) {
        history.push(require_commit(conn, id)?);
    }
    Ok(history)
}

/// Step-granular changes from commit `from` to commit `to`
pub fn diff_commits(conn: &Connection, from: &str, to: &str) -> Result<Vec<Change>> {
    let old = commit_data(conn, &require_commit(conn, from)?)?;
    let new = commit_data(conn, &require_commit(conn, to)?)?;
    Ok(calculate_changes(&old, &new))
}
