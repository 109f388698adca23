//! Structural diff engine.
//!
//! Compares two project documents and produces a path-addressed change list.
//!
//! ## Entry points
//!
//! ```
//! use stepvc_core::diff::{calculate_changes, compute_stats};
//! use stepvc_core::model::ProjectData;
//! use serde_json::json;
//!
//! let old = ProjectData::new().with_steps(vec![json!({"title": "A"})]);
//! let new = old.clone().with_variable("env", json!("prod"));
//! let changes = calculate_changes(&old, &new);
//! assert_eq!(changes.len(), 1);
//! assert_eq!(compute_stats(&changes).additions, 1);
//! ```
//!
//! ## Granularity
//!
//! - [`calculate_changes`] is step-granular: steps are aligned by index and
//!   compared as whole values, maps are aligned by key. This is what commits
//!   record.
//! - [`leaf_diff`] recurses through objects and arrays present on both
//!   sides and reports changes at the deepest differing path, each with its
//!   typed [`ValuePath`](crate::path::ValuePath). The merge engine uses it;
//!   [`leaf_changes`] is the same list without the typed paths.
//!
//! Rendered paths escape `.` and `\` inside keys, so a variable named
//! `user.name` appears as `variables.user\.name` and parses back to one
//! key.
//! - [`apply_changes`] replays a change list onto a document; stashes use it.

pub mod apply;
pub mod engine;
pub mod human_summary;
pub mod stats;

pub use apply::apply_changes;
pub use engine::{calculate_changes, leaf_changes, leaf_diff, touched_paths, LeafChange};
pub use human_summary::render_change_summary;
pub use stats::compute_stats;
