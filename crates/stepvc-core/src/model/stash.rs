use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::commit::Change;

/// A parked, uncommitted change set relative to a branch head
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StashEntry {
    pub id: String,
    pub project_id: String,
    pub branch_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub changes: Vec<Change>,
}
