use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a single structural change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Add,
    Modify,
    Delete,
    Rename,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Add => "add",
            ChangeType::Modify => "modify",
            ChangeType::Delete => "delete",
            ChangeType::Rename => "rename",
        }
    }
}

/// A path-addressed change between two project documents
///
/// Changes are derived data. State is always rebuilt from snapshots, never
/// by replaying changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    /// Dot-delimited path; numeric segments index into arrays
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Change {
    pub fn add(path: impl Into<String>, new_value: Value) -> Self {
        Self {
            change_type: ChangeType::Add,
            path: path.into(),
            old_value: None,
            new_value: Some(new_value),
            metadata: None,
        }
    }

    pub fn modify(path: impl Into<String>, old_value: Value, new_value: Value) -> Self {
        Self {
            change_type: ChangeType::Modify,
            path: path.into(),
            old_value: Some(old_value),
            new_value: Some(new_value),
            metadata: None,
        }
    }

    pub fn delete(path: impl Into<String>, old_value: Value) -> Self {
        Self {
            change_type: ChangeType::Delete,
            path: path.into(),
            old_value: Some(old_value),
            new_value: None,
            metadata: None,
        }
    }
}

/// Aggregate counts over a change list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommitStats {
    pub additions: usize,
    pub modifications: usize,
    pub deletions: usize,
    pub renames: usize,
    /// Number of distinct paths touched
    pub paths_changed: usize,
}

/// A named, authored pointer to a snapshot plus its diff from the parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub project_id: String,
    pub branch_id: String,
    pub message: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub snapshot_id: String,
    /// Single lineage parent (None for a root commit)
    pub parent_id: Option<String>,
    /// Source head folded in by a three-way merge. Informational only:
    /// ancestry walks follow `parent_id` exclusively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_parent_id: Option<String>,
    pub changes: Vec<Change>,
    pub stats: CommitStats,
}

impl Commit {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_merge_result(&self) -> bool {
        self.merge_parent_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_change_serializes_type_field() {
        let change = Change::add("steps.0", json!({"title": "A"}));
        let value = serde_json::to_value(&change).unwrap();
        assert_eq!(value["type"], json!("add"));
        assert!(value.get("old_value").is_none());
    }

    #[test]
    fn test_change_type_as_str() {
        assert_eq!(ChangeType::Modify.as_str(), "modify");
        assert_eq!(ChangeType::Rename.as_str(), "rename");
    }
}
