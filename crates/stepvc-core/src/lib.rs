//! stepvc core - versioning kernel for step-structured project documents
//!
//! This crate is pure and I/O-free. It provides:
//! - The data model (snapshots, commits, branches, tags, merge requests, stashes)
//! - Dot-path addressing into JSON trees
//! - The structural diff engine and change summaries
//! - Ancestry walking over single-parent commit chains
//! - Three-way merge and the branch-comparison conflict predictor
//! - The change-notification event bus
//! - The error and logging facilities shared by the store and engine

pub mod ancestry;
pub mod diff;
pub mod errors;
pub mod events;
pub mod logging_facility;
pub mod merge;
pub mod model;
pub mod path;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, Result, VcsError};
pub use events::{EventBus, EventKind, ListenerId, VersionEvent};
pub use model::{Branch, Change, ChangeType, Commit, MergeConflict, ProjectData, Snapshot, Tag};
pub use path::ValuePath;

#[doc(hidden)]
pub mod __private {
    pub use stepvc_core_types::schema;
    pub use tracing;
}
