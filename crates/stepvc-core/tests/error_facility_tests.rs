use stepvc_core::errors::{ExError, ExErrorKind, VcsError};
use stepvc_core::model::{ConflictType, MergeConflict};

#[test]
fn test_branch_not_found_kind() {
    let ex: ExError = VcsError::BranchNotFound {
        branch: "feature".to_string(),
    }
    .into();

    assert_eq!(ex.kind(), ExErrorKind::BranchNotFound);
    assert_eq!(ex.code(), "ERR_BRANCH_NOT_FOUND");
    assert_eq!(ex.entity_id(), Some("feature"));
}

#[test]
fn test_merge_conflict_carries_conflicts() {
    let conflict = MergeConflict {
        path: "steps.0.title".to_string(),
        conflict_type: ConflictType::Content,
        base_value: Some(serde_json::json!("A")),
        source_value: Some(serde_json::json!("X")),
        target_value: Some(serde_json::json!("Y")),
    };
    let ex: ExError = VcsError::MergeConflict {
        conflicts: vec![conflict.clone()],
    }
    .into();

    assert_eq!(ex.kind(), ExErrorKind::MergeConflict);
    assert_eq!(ex.conflicts(), Some(&[conflict][..]));
}

#[test]
fn test_merge_into_self_is_invalid_merge() {
    let ex: ExError = VcsError::MergeIntoSelf {
        branch: "b1".to_string(),
    }
    .into();
    assert_eq!(ex.kind(), ExErrorKind::InvalidMerge);
}

#[test]
fn test_lookup_misses_share_not_found() {
    let misses = vec![
        VcsError::SnapshotNotFound {
            snapshot_id: "s".into(),
        },
        VcsError::TagNotFound { tag: "t".into() },
        VcsError::StashNotFound {
            stash_id: "st".into(),
        },
    ];
    for err in misses {
        let ex: ExError = err.into();
        assert_eq!(ex.kind(), ExErrorKind::NotFound);
    }
}

#[test]
fn test_unknown_commit_is_invalid_commit() {
    let ex: ExError = VcsError::CommitNotFound {
        commit_id: "c".into(),
    }
    .into();
    assert_eq!(ex.kind(), ExErrorKind::InvalidCommit);
    assert_eq!(ex.code(), "ERR_INVALID_COMMIT");
    assert_eq!(ex.entity_id(), Some("c"));
}

#[test]
fn test_builder_and_display() {
    let ex = ExError::new(ExErrorKind::HeadMismatch)
        .with_op("commit")
        .with_entity_id("branch:1")
        .with_project_id("p1")
        .with_message("head moved");

    assert_eq!(ex.op(), Some("commit"));
    assert_eq!(ex.project_id(), Some("p1"));
    let rendered = ex.to_string();
    assert!(rendered.contains("ERR_HEAD_MISMATCH"));
    assert!(rendered.contains("commit"));
}

#[test]
fn test_error_kind_codes_are_unique() {
    let kinds = [
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
    let codes: std::collections::HashSet<&str> = kinds.iter().map(|k| k.code()).collect();
    assert_eq!(codes.len(), kinds.len());
    assert!(codes.iter().all(|c| c.starts_with("ERR_")));
}
