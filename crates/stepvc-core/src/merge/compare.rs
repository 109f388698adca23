//! Branch comparison and the touched-by-both conflict predictor.

use crate::diff::{calculate_changes, touched_paths};
use crate::model::ProjectData;
use serde::{Deserialize, Serialize};

/// Relationship between two branch heads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchComparison {
    /// Source commits not on the target
    pub ahead: usize,
    /// Target commits not on the source
    pub behind: usize,
    pub common_ancestor: Option<String>,
    /// Paths touched by both sides since the common ancestor
    pub conflicts: Vec<String>,
}

impl BranchComparison {
    /// Nothing to merge: source has no commits the target lacks
    pub fn is_up_to_date(&self) -> bool {
        self.ahead == 0
    }

    /// Target can simply move forward to the source head
    pub fn can_fast_forward(&self) -> bool {
        self.behind == 0 && self.ahead > 0
    }
}

/// Step-granular paths changed on both sides since `base`
///
/// An upper bound: the real merge may settle some of these (equal values,
/// different fields of the same step).
pub fn predict_conflicts(
    base: &ProjectData,
    source: &ProjectData,
    target: &ProjectData,
) -> Vec<String> {
    let source_paths = touched_paths(&calculate_changes(base, source));
    let target_paths = touched_paths(&calculate_changes(base, target));
    source_paths
        .intersection(&target_paths)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_predictor_reports_step_touched_by_both() {
        let base = ProjectData::new().with_steps(vec![json!({"title": "A", "body": "x"})]);
        let source = ProjectData::new().with_steps(vec![json!({"title": "A2", "body": "x"})]);
        let target = ProjectData::new().with_steps(vec![json!({"title": "A", "body": "y"})]);
        // Different fields of the same step: the merge would succeed, the
        // predictor still flags the step.
        assert_eq!(predict_conflicts(&base, &source, &target), vec!["steps.0"]);
    }

    #[test]
    fn test_predictor_disjoint() {
        let base = ProjectData::new().with_variable("a", json!(1));
        let source = base.clone().with_variable("b", json!(2));
        let target = base.clone().with_metadata("c", json!(3));
        assert!(predict_conflicts(&base, &source, &target).is_empty());
    }

    #[test]
    fn test_comparison_flags() {
        let cmp = BranchComparison {
            ahead: 2,
            behind: 0,
            common_ancestor: Some("c1".into()),
            conflicts: vec![],
        };
        assert!(cmp.can_fast_forward());
        assert!(!cmp.is_up_to_date());
    }
}
