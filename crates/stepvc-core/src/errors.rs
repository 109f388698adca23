//! Errors for stepvc
//!
//! The pure kernel returns [`VcsError`], a plain `thiserror` enum with the
//! offending ids inline. The store and engine surface [`ExError`] instead:
//! a classified error carrying a stable `ERR_*` code, optional context
//! (operation, entity, project) and, for failed merges, the conflicts
//! themselves. `VcsError` converts into `ExError` with `?`.

use std::fmt;

use thiserror::Error;

use crate::model::MergeConflict;

pub type Result<T> = std::result::Result<T, VcsError>;

/// Classification of an [`ExError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    NotFound,
    BranchNotFound,
    AlreadyExists,
    /// Unknown commit id, or a commit unusable for the operation
    InvalidCommit,
    /// Optimistic concurrency check failed
    HeadMismatch,
    MergeConflict,
    /// Merge request that can never succeed, such as a branch into itself
    InvalidMerge,
    InvalidResolution,
    InvalidPath,
    InvalidInput,
    ProjectNotInitialized,
    Serialization,
    Persistence,
    /// The database could not be opened or migrated
    StoreUnavailable,
    Internal,
}

impl ExErrorKind {
    pub const ALL: [ExErrorKind; 15] = [
        ExErrorKind::NotFound,
        ExErrorKind::BranchNotFound,
        ExErrorKind::AlreadyExists,
        ExErrorKind::InvalidCommit,
        ExErrorKind::HeadMismatch,
        ExErrorKind::MergeConflict,
        ExErrorKind::InvalidMerge,
        ExErrorKind::InvalidResolution,
        ExErrorKind::InvalidPath,
        ExErrorKind::InvalidInput,
        ExErrorKind::ProjectNotInitialized,
        ExErrorKind::Serialization,
        ExErrorKind::Persistence,
        ExErrorKind::StoreUnavailable,
        ExErrorKind::Internal,
    ];

    /// Stable machine-readable code, e.g. `ERR_HEAD_MISMATCH`
    pub fn code(self) -> &'static str {
        match self {
            Self::NotFound => "ERR_NOT_FOUND",
            Self::BranchNotFound => "ERR_BRANCH_NOT_FOUND",
            Self::AlreadyExists => "ERR_ALREADY_EXISTS",
            Self::InvalidCommit => "ERR_INVALID_COMMIT",
            Self::HeadMismatch => "ERR_HEAD_MISMATCH",
            Self::MergeConflict => "ERR_MERGE_CONFLICT",
            Self::InvalidMerge => "ERR_INVALID_MERGE",
            Self::InvalidResolution => "ERR_INVALID_RESOLUTION",
            Self::InvalidPath => "ERR_INVALID_PATH",
            Self::InvalidInput => "ERR_INVALID_INPUT",
            Self::ProjectNotInitialized => "ERR_PROJECT_NOT_INITIALIZED",
            Self::Serialization => "ERR_SERIALIZATION",
            Self::Persistence => "ERR_PERSISTENCE",
            Self::StoreUnavailable => "ERR_STORE_UNAVAILABLE",
            Self::Internal => "ERR_INTERNAL",
        }
    }
}

impl fmt::Display for ExErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Default)]
struct ErrorContext {
    op: Option<String>,
    entity_id: Option<String>,
    project_id: Option<String>,
}

impl ErrorContext {
    fn is_empty(&self) -> bool {
        self.op.is_none() && self.entity_id.is_none() && self.project_id.is_none()
    }
}

/// Classified error returned by the store and the engine
///
/// Built with [`ExError::new`] and the `with_*` methods. Renders as
/// `CODE: message [op=.. entity=.. project=..]`.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    message: String,
    context: ErrorContext,
    source: Option<Box<ExError>>,
    conflicts: Option<Vec<MergeConflict>>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            message: String::new(),
            context: ErrorContext::default(),
            source: None,
            conflicts: None,
        }
    }

    /// Name of the operation that failed
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.context.op = Some(op.into());
        self
    }

    /// Id of the branch, commit, path or record the error concerns
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.context.entity_id = Some(id.into());
        self
    }

    pub fn with_project_id(mut self, id: impl Into<String>) -> Self {
        self.context.project_id = Some(id.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Chain the error this one wraps
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach the unresolved conflicts of a failed merge
    pub fn with_conflicts(mut self, conflicts: Vec<MergeConflict>) -> Self {
        self.conflicts = Some(conflicts);
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.context.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.context.entity_id.as_deref()
    }

    pub fn project_id(&self) -> Option<&str> {
        self.context.project_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Wrapped error, if this one was raised on top of another
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Conflicts carried by a `MergeConflict` error
    pub fn conflicts(&self) -> Option<&[MergeConflict]> {
        self.conflicts.as_deref()
    }
}

impl fmt::Display for ExError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if !self.context.is_empty() {
            let parts = [
                ("op", &self.context.op),
                ("entity", &self.context.entity_id),
                ("project", &self.context.project_id),
            ];
            let rendered: Vec<String> = parts
                .iter()
                .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}={v}")))
                .collect();
            write!(f, " [{}]", rendered.join(" "))?;
        }
        if let Some(conflicts) = &self.conflicts {
            write!(f, " ({} conflicts)", conflicts.len())?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.source {
            Some(inner) => Some(inner.as_ref() as &(dyn std::error::Error + 'static)),
            None => None,
        }
    }
}

/// Domain error taxonomy for versioning operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VcsError {
    /// Branch not found (by id or name)
    #[error("Branch not found: {branch}")]
    BranchNotFound { branch: String },

    /// Commit not found
    #[error("Commit not found: {commit_id}")]
    CommitNotFound { commit_id: String },

    /// Snapshot referenced by a commit is missing
    #[error("Snapshot not found: {snapshot_id}")]
    SnapshotNotFound { snapshot_id: String },

    /// Tag not found
    #[error("Tag not found: {tag}")]
    TagNotFound { tag: String },

    /// Merge request not found
    #[error("Merge request not found: {merge_request_id}")]
    MergeRequestNotFound { merge_request_id: String },

    /// Stash entry not found
    #[error("Stash entry not found: {stash_id}")]
    StashNotFound { stash_id: String },

    /// Project has no config record
    #[error("Project not initialized: {project_id}")]
    ProjectNotInitialized { project_id: String },

    /// Entity already exists (duplicate id or name)
    #[error("Already exists: {entity_id}")]
    AlreadyExists { entity_id: String },

    /// Commit cannot be used for the requested operation
    #[error("Invalid commit {commit_id}: {reason}")]
    InvalidCommit { commit_id: String, reason: String },

    /// Branch head moved since the caller read it
    #[error("Branch {branch_id} head is {actual:?}, expected {expected}")]
    HeadMismatch {
        branch_id: String,
        expected: String,
        actual: Option<String>,
    },

    /// Three-way merge found unresolved conflicts
    #[error("Merge has {} unresolved conflict(s)", conflicts.len())]
    MergeConflict { conflicts: Vec<MergeConflict> },

    /// Source and target are the same branch
    #[error("Cannot merge branch {branch} into itself")]
    MergeIntoSelf { branch: String },

    /// The two branches share no history
    #[error("Branches {source_branch} and {target_branch} have no common ancestor")]
    NoCommonAncestor {
        source_branch: String,
        target_branch: String,
    },

    /// A resolution cannot be applied
    #[error("Invalid resolution for {path}: {reason}")]
    InvalidResolution { path: String, reason: String },

    /// Path is empty or cannot be walked
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// JSON encoding or decoding failed
    #[error("JSON error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<VcsError> for ExError {
    fn from(err: VcsError) -> Self {
        match err {
            VcsError::BranchNotFound { branch } => ExError::new(ExErrorKind::BranchNotFound)
                .with_entity_id(branch)
                .with_message("Branch not found"),
            VcsError::CommitNotFound { commit_id } => ExError::new(ExErrorKind::InvalidCommit)
                .with_entity_id(commit_id)
                .with_message("Commit not found"),
            VcsError::SnapshotNotFound { snapshot_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(snapshot_id)
                .with_message("Snapshot not found"),
            VcsError::TagNotFound { tag } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(tag)
                .with_message("Tag not found"),
            VcsError::MergeRequestNotFound { merge_request_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(merge_request_id)
                    .with_message("Merge request not found")
            }
            VcsError::StashNotFound { stash_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(stash_id)
                .with_message("Stash entry not found"),
            VcsError::ProjectNotInitialized { project_id } => {
                ExError::new(ExErrorKind::ProjectNotInitialized)
                    .with_project_id(project_id)
                    .with_message("Project has no configuration; call init_project first")
            }
            VcsError::AlreadyExists { entity_id } => ExError::new(ExErrorKind::AlreadyExists)
                .with_entity_id(entity_id)
                .with_message("Entity already exists"),
            VcsError::InvalidCommit { commit_id, reason } => {
                ExError::new(ExErrorKind::InvalidCommit)
                    .with_entity_id(commit_id)
                    .with_message(reason)
            }
            VcsError::HeadMismatch {
                branch_id,
                expected,
                actual,
            } => ExError::new(ExErrorKind::HeadMismatch)
                .with_entity_id(branch_id)
                .with_message(format!(
                    "Expected head '{}' but current is '{}'",
                    expected,
                    actual.unwrap_or_default()
                )),
            VcsError::MergeConflict { conflicts } => ExError::new(ExErrorKind::MergeConflict)
                .with_message(format!("{} unresolved conflict(s)", conflicts.len()))
                .with_conflicts(conflicts),
            VcsError::MergeIntoSelf { branch } => ExError::new(ExErrorKind::InvalidMerge)
                .with_entity_id(branch)
                .with_message("Cannot merge a branch into itself"),
            VcsError::NoCommonAncestor {
                source_branch,
                target_branch,
            } => ExError::new(ExErrorKind::InvalidMerge)
                .with_entity_id(source_branch)
                .with_message(format!("No common ancestor with {}", target_branch)),
            VcsError::InvalidResolution { path, reason } => {
                ExError::new(ExErrorKind::InvalidResolution)
                    .with_entity_id(path)
                    .with_message(reason)
            }
            VcsError::InvalidPath { path, reason } => ExError::new(ExErrorKind::InvalidPath)
                .with_entity_id(path)
                .with_message(reason),
            VcsError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            VcsError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for VcsError {
    fn from(err: serde_json::Error) -> Self {
        VcsError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConflictType;

    #[test]
    fn test_merge_error_kind_codes() {
        let cases = [
            (ExErrorKind::MergeConflict, "ERR_MERGE_CONFLICT"),
            (ExErrorKind::InvalidMerge, "ERR_INVALID_MERGE"),
            (ExErrorKind::InvalidResolution, "ERR_INVALID_RESOLUTION"),
            (ExErrorKind::HeadMismatch, "ERR_HEAD_MISMATCH"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_merge_conflict_carries_conflicts() {
        let conflict = MergeConflict {
            path: "steps.0.title".into(),
            conflict_type: ConflictType::Content,
            base_value: Some(serde_json::json!("A")),
            source_value: Some(serde_json::json!("X")),
            target_value: Some(serde_json::json!("Y")),
        };
        let err: ExError = VcsError::MergeConflict {
            conflicts: vec![conflict.clone()],
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::MergeConflict);
        assert_eq!(err.conflicts(), Some(&[conflict][..]));
    }

    #[test]
    fn test_all_codes_distinct() {
        let mut codes: Vec<&str> = ExErrorKind::ALL.iter().map(|k| k.code()).collect();
        assert!(codes.iter().all(|c| c.starts_with("ERR_")));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), ExErrorKind::ALL.len());
    }

    #[test]
    fn test_display_layout() {
        let bare = ExError::new(ExErrorKind::Internal);
        assert_eq!(bare.to_string(), "ERR_INTERNAL");

        let full = ExError::new(ExErrorKind::BranchNotFound)
            .with_message("Branch not found")
            .with_op("merge_branches")
            .with_entity_id("feature");
        assert_eq!(
            full.to_string(),
            "ERR_BRANCH_NOT_FOUND: Branch not found [op=merge_branches entity=feature]"
        );
    }

    #[test]
    fn test_source_chain_visible_through_std_error() {
        use std::error::Error as _;
        let inner = ExError::new(ExErrorKind::Persistence).with_message("disk full");
        let outer = ExError::new(ExErrorKind::StoreUnavailable).with_source(inner);
        let source = outer.source().map(|e| e.to_string());
        assert_eq!(source.as_deref(), Some("ERR_PERSISTENCE: disk full"));
    }

    #[test]
    fn test_conflicts_none_by_default() {
        let err = ExError::new(ExErrorKind::NotFound);
        assert!(err.conflicts().is_none());
    }
}
