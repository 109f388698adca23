pub mod branch;
pub mod commit;
pub mod config;
pub mod merge;
pub mod project;
pub mod snapshot;
pub mod stash;

pub use branch::{Branch, Tag, TagType};
pub use commit::{Change, ChangeType, Commit, CommitStats};
pub use config::{ProjectConfig, ProjectConfigOverrides};
pub use merge::{
    ConflictType, MergeConflict, MergeRequest, MergeRequestStatus, Resolution, ResolutionStrategy,
};
pub use project::ProjectData;
pub use snapshot::Snapshot;
pub use stash::StashEntry;

/// Current time truncated to whole milliseconds, the precision the store keeps
pub fn now_millis() -> chrono::DateTime<chrono::Utc> {
    use chrono::SubsecRound;
    chrono::Utc::now().trunc_subsecs(3)
}
