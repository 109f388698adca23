//! Three-way merge and branch comparison.
//!
//! Two deliberately separate code paths:
//!
//! - [`three_way::three_way_merge`] is the real merge: it walks leaf-level
//!   changes from the base to the source and folds them into the target,
//!   applying equality and base comparisons before declaring a conflict.
//! - [`compare::predict_conflicts`] is a cheap upper bound used for
//!   display: any step-granular path touched by both sides is reported.

pub mod compare;
pub mod three_way;

pub use compare::{predict_conflicts, BranchComparison};
pub use three_way::{three_way_merge, ThreeWayMerge};
