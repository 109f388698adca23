use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classification of a merge conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// Both sides changed the same path to different values
    Content,
}

/// A path changed incompatibly on both sides since the common ancestor
///
/// A side whose value is `None` removed the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeConflict {
    pub path: String,
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    pub base_value: Option<Value>,
    pub source_value: Option<Value>,
    pub target_value: Option<Value>,
}

/// How a caller settles one conflicting path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    UseSource,
    UseTarget,
    UseBase,
    Manual,
}

/// Caller-supplied resolution for one conflict path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub path: String,
    pub strategy: ResolutionStrategy,
    /// Explicit value; required for `Manual`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Resolution {
    pub fn use_source(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            strategy: ResolutionStrategy::UseSource,
            value: None,
        }
    }

    pub fn use_target(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            strategy: ResolutionStrategy::UseTarget,
            value: None,
        }
    }

    pub fn use_base(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            strategy: ResolutionStrategy::UseBase,
            value: None,
        }
    }

    pub fn manual(path: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            strategy: ResolutionStrategy::Manual,
            value: Some(value),
        }
    }
}

/// Lifecycle of a merge request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeRequestStatus {
    Pending,
    Merged,
    Closed,
    Conflicted,
}

impl MergeRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeRequestStatus::Pending => "pending",
            MergeRequestStatus::Merged => "merged",
            MergeRequestStatus::Closed => "closed",
            MergeRequestStatus::Conflicted => "conflicted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MergeRequestStatus::Pending),
            "merged" => Some(MergeRequestStatus::Merged),
            "closed" => Some(MergeRequestStatus::Closed),
            "conflicted" => Some(MergeRequestStatus::Conflicted),
            _ => None,
        }
    }

    /// Merged and closed requests accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MergeRequestStatus::Merged | MergeRequestStatus::Closed
        )
    }
}

/// Bookkeeping record around a merge between two branches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub id: String,
    pub project_id: String,
    /// Source branch id
    pub source_branch: String,
    /// Target branch id
    pub target_branch: String,
    pub title: String,
    pub description: Option<String>,
    pub author: String,
    pub status: MergeRequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<MergeConflict>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
