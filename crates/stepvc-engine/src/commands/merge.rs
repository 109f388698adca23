//! Branch comparison and merging.
//!
//! ## Merge state machine
//! 1. Source unborn, or target lineage already holds the source head: up to date
//! 2. Target unborn, or source lineage holds the target head: fast-forward
//!    (pointer move only, no commit or snapshot)
//! 3. Otherwise three-way merge against the most recent common ancestor:
//!    clean → one new commit on the target; conflicts → MergeConflict error
//!    and nothing is written
//!
//! Merge commits keep a single lineage parent (the target's prior head). The
//! merged source head is recorded in `merge_parent_id` for display only.

use super::commit::{record_commit, NewCommit};
use super::{commit_data, default_author, instrumented, require_branch, require_commit};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use stepvc_core::ancestry::{ahead_behind, chain_contains, commit_chain, find_common_ancestor};
use stepvc_core::errors::VcsError;
use stepvc_core::events::EventBus;
use stepvc_core::merge::{predict_conflicts, three_way_merge, BranchComparison};
use stepvc_core::model::{Branch, Commit, Resolution};
use stepvc_store::errors::Result;
use stepvc_store::{SqliteCommitSource, SqliteRepo};

/// Terminal outcome of a successful merge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// Target already contains the source; nothing changed
    UpToDate { head: Option<String> },
    /// Target pointer moved to the source head
    FastForward { from: Option<String>, to: String },
    /// Three-way merge committed onto the target
    Merged { commit: Box<Commit> },
}

impl MergeOutcome {
    /// Target head after the merge
    pub fn head(&self) -> Option<&str> {
        match self {
            MergeOutcome::UpToDate { head } => head.as_deref(),
            MergeOutcome::FastForward { to, .. } => Some(to),
            MergeOutcome::Merged { commit } => Some(&commit.id),
        }
    }

    pub fn commit(&self) -> Option<&Commit> {
        match self {
            MergeOutcome::Merged { commit } => Some(commit),
            _ => None,
        }
    }
}

fn load_pair(conn: &Connection, source_id: &str, target_id: &str) -> Result<(Branch, Branch)> {
    let source = require_branch(conn, source_id)?;
    let target = require_branch(conn, target_id)?;
    if source.id == target.id {
        return Err(VcsError::MergeIntoSelf {
            branch: source.name,
        }
        .into());
    }
    if source.project_id != target.project_id {
        return Err(VcsError::NoCommonAncestor {
            source_branch: source.name,
            target_branch: target.name,
        }
        .into());
    }
    Ok((source, target))
}

fn chain_of(conn: &Connection, branch: &Branch) -> Result<Vec<String>> {
    match branch.head() {
        Some(head) => commit_chain(&SqliteCommitSource::new(conn), head),
        None => Ok(Vec::new()),
    }
}

/// Ahead/behind counts and the touched-by-both predictor for two branches
pub fn compare_branches(
    conn: &Connection,
    source_id: &str,
    target_id: &str,
) -> Result<BranchComparison> {
    instrumented("compare_branches", || {
        let (source, target) = load_pair(conn, source_id, target_id)?;
        let source_chain = chain_of(conn, &source)?;
        let target_chain = chain_of(conn, &target)?;

        let ancestor = find_common_ancestor(&source_chain, &target_chain);
        let (ahead, behind) = ahead_behind(&source_chain, &target_chain, ancestor.as_deref());

        let conflicts = match (&ancestor, source.head(), target.head()) {
            (Some(base), Some(src), Some(tgt)) if ahead > 0 && behind > 0 => {
                let base = commit_data(conn, &require_commit(conn, base)?)?;
                let src = commit_data(conn, &require_commit(conn, src)?)?;
                let tgt = commit_data(conn, &require_commit(conn, tgt)?)?;
                predict_conflicts(&base, &src, &tgt)
            }
            _ => Vec::new(),
        };

        Ok(BranchComparison {
            ahead,
            behind,
            common_ancestor: ancestor,
            conflicts,
        })
    })
}

/// Merge `source` into `target` with no resolutions
pub fn merge_branches(
    conn: &mut Connection,
    events: &EventBus,
    source_id: &str,
    target_id: &str,
) -> Result<MergeOutcome> {
    merge_with_resolutions(conn, events, source_id, target_id, &[])
}

/// Merge `source` into `target`, settling conflicts with `resolutions`
///
/// Any conflict without a resolution aborts the merge with the remaining
/// conflicts; both branches are left untouched.
pub fn merge_with_resolutions(
    conn: &mut Connection,
    events: &EventBus,
    source_id: &str,
    target_id: &str,
    resolutions: &[Resolution],
) -> Result<MergeOutcome> {
    instrumented("merge_branches", || {
        let (source, target) = load_pair(conn, source_id, target_id)?;

        let source_head = match source.head() {
            Some(head) => head.to_string(),
            None => {
                return Ok(MergeOutcome::UpToDate {
                    head: target.head().map(str::to_string),
                })
            }
        };

        let target_chain = chain_of(conn, &target)?;
        if chain_contains(&target_chain, &source_head) {
            return Ok(MergeOutcome::UpToDate {
                head: target.head().map(str::to_string),
            });
        }

        let source_chain = chain_of(conn, &source)?;
        let fast_forward = match target.head() {
            None => true,
            Some(target_head) => chain_contains(&source_chain, target_head),
        };
        if fast_forward {
            SqliteRepo::set_branch_head(conn, &target.id, &source_head)?;
            tracing::info!(
                source_branch = %source.name,
                target_branch = %target.name,
                head = %source_head,
                "Fast-forwarded branch"
            );
            return Ok(MergeOutcome::FastForward {
                from: target.head().map(str::to_string),
                to: source_head,
            });
        }

        let base_id = find_common_ancestor(&source_chain, &target_chain).ok_or_else(|| {
            VcsError::NoCommonAncestor {
                source_branch: source.name.clone(),
                target_branch: target.name.clone(),
            }
        })?;

        let base = commit_data(conn, &require_commit(conn, &base_id)?)?;
        let src = commit_data(conn, &require_commit(conn, &source_head)?)?;
        let tgt = commit_data(conn, &require_commit(conn, &target.current_commit)?)?;

        let result = three_way_merge(&base, &src, &tgt, resolutions)?;
        if !result.conflicts.is_empty() {
            tracing::info!(
                source_branch = %source.name,
                target_branch = %target.name,
                conflict_count = result.conflicts.len(),
                "Merge stopped on conflicts"
            );
            return Err(VcsError::MergeConflict {
                conflicts: result.conflicts,
            }
            .into());
        }

        let author = default_author(conn, &target.project_id)?;
        let commit = record_commit(
            conn,
            events,
            NewCommit {
                branch: &target,
                message: format!("Merge branch '{}' into '{}'", source.name, target.name),
                author,
                data: &result.merged,
                merge_parent_id: Some(source_head),
                expected_head: Some(target.current_commit.clone()),
            },
        )?;

        Ok(MergeOutcome::Merged {
            commit: Box::new(commit),
        })
    })
}
