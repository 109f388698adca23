use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A mutable named pointer to the latest commit of a lineage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub project_id: String,
    /// Head commit id; empty while the branch is unborn
    pub current_commit: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Branch {
    pub fn new(id: String, project_id: String, name: String, current_commit: String) -> Self {
        Self {
            id,
            name,
            project_id,
            current_commit,
            created_at: super::now_millis(),
            is_active: false,
        }
    }

    /// True until the first commit lands on the branch
    pub fn is_unborn(&self) -> bool {
        self.current_commit.is_empty()
    }

    /// Head commit id, if any
    pub fn head(&self) -> Option<&str> {
        if self.is_unborn() {
            None
        } else {
            Some(&self.current_commit)
        }
    }
}

/// Kind of tag, derived from whether a message was supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagType {
    Lightweight,
    Annotated,
}

impl TagType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagType::Lightweight => "lightweight",
            TagType::Annotated => "annotated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lightweight" => Some(TagType::Lightweight),
            "annotated" => Some(TagType::Annotated),
            _ => None,
        }
    }

    pub fn for_message(message: Option<&str>) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => TagType::Annotated,
            _ => TagType::Lightweight,
        }
    }
}

/// Immutable named pointer to a commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub project_id: String,
    pub commit_id: String,
    pub tag_type: TagType,
    pub message: Option<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
}
