use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::project::ProjectData;

/// Immutable full capture of project data at one point in time
///
/// Snapshot ids are minted independently of content; two identical payloads
/// committed twice produce two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub project_id: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub author: String,
    pub data: ProjectData,
    /// Snapshot of the previous head on the same branch, if any
    pub parent: Option<String>,
}
