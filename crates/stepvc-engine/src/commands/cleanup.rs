//! Retention: prune the oldest commits of each branch beyond `max_history`.
//!
//! Parent pointers of the retained commits are left as they are, so a chain
//! walk that reaches a pruned id stops there as if it had hit a root.
//! Commits that are a branch head or a tag target are never pruned.

use super::{instrumented, require_config};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use stepvc_store::errors::{from_rusqlite, Result};
use stepvc_store::SqliteRepo;

/// Counts from one cleanup run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub commits_removed: usize,
    pub snapshots_removed: usize,
    /// Branches that had commits pruned
    pub branches_pruned: usize,
}

/// Prune every branch of a project down to its configured history
///
/// All deletions of a run happen in one transaction. With
/// `max_history == 0` nothing is pruned.
pub fn cleanup(conn: &mut Connection, project_id: &str) -> Result<CleanupReport> {
    instrumented("cleanup", || {
        let config = require_config(conn, project_id)?;
        let mut report = CleanupReport::default();
        if !config.retention_enabled() {
            tracing::debug!(project_id, "Retention disabled; nothing to prune");
            return Ok(report);
        }

        let branches = SqliteRepo::list_branches(conn, project_id)?;
        let mut protected: HashSet<String> = branches
            .iter()
            .filter_map(|b| b.head().map(str::to_string))
            .collect();
        protected.extend(
            SqliteRepo::list_tags(conn, project_id)?
                .into_iter()
                .map(|t| t.commit_id),
        );

        let tx = conn.transaction().map_err(from_rusqlite)?;
        for branch in &branches {
            let commits = SqliteRepo::list_commits_for_branch(&tx, &branch.id)?;
            if commits.len() <= config.max_history {
                continue;
            }

            let mut pruned_here = 0;
            for commit in commits.iter().skip(config.max_history) {
                if protected.contains(&commit.id) {
                    continue;
                }
                if SqliteRepo::delete_commit(&tx, &commit.id)? {
                    report.commits_removed += 1;
                    pruned_here += 1;
                }
                if SqliteRepo::delete_snapshot(&tx, &commit.snapshot_id)? {
                    report.snapshots_removed += 1;
                }
            }
            if pruned_here > 0 {
                report.branches_pruned += 1;
                tracing::info!(
                    project_id,
                    branch = %branch.name,
                    pruned = pruned_here,
                    "Pruned branch history"
                );
            }
        }
        tx.commit().map_err(from_rusqlite)?;

        Ok(report)
    })
}
