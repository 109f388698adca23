//! Change-list statistics.

use crate::diff::engine::touched_paths;
use crate::model::{Change, ChangeType, CommitStats};

/// Count changes by type and the number of distinct paths touched
pub fn compute_stats(changes: &[Change]) -> CommitStats {
    let mut stats = CommitStats::default();
    for change in changes {
        match change.change_type {
            ChangeType::Add => stats.additions += 1,
            ChangeType::Modify => stats.modifications += 1,
            ChangeType::Delete => stats.deletions += 1,
            ChangeType::Rename => stats.renames += 1,
        }
    }
    stats.paths_changed = touched_paths(changes).len();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counts_by_type() {
        let changes = vec![
            Change::add("steps.2", json!("C")),
            Change::modify("steps.0", json!("A"), json!("A2")),
            Change::delete("variables.x", json!(1)),
            Change::add("variables.y", json!(2)),
        ];
        let stats = compute_stats(&changes);
        assert_eq!(stats.additions, 2);
        assert_eq!(stats.modifications, 1);
        assert_eq!(stats.deletions, 1);
        assert_eq!(stats.paths_changed, 4);
    }

    #[test]
    fn test_duplicate_paths_counted_once() {
        let changes = vec![
            Change::delete("steps.0", json!("A")),
            Change::add("steps.0", json!("B")),
        ];
        assert_eq!(compute_stats(&changes).paths_changed, 1);
    }

    #[test]
    fn test_empty() {
        assert_eq!(compute_stats(&[]), CommitStats::default());
    }
}
