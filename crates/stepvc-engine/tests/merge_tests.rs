// Branch comparison and merging through the engine: fast-forward, no-op,
// three-way scenarios, resolutions, and the no-partial-write guarantee

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{setup, steps, titles, PROJECT};
use serde_json::json;
use stepvc_core::errors::ExErrorKind;
use stepvc_core::model::{Commit, Resolution};
use stepvc_engine::{CommitOptions, MergeOutcome, VersionEngine};

struct Diverged {
    engine: VersionEngine,
    main: String,
    feature: String,
    base: Commit,
}

/// main at C1 with steps [A,B]; feature forked from C1; each side then
/// commits its own data
fn diverge(feature_titles: &[&str], main_titles: &[&str]) -> Diverged {
    let (mut engine, main) = setup();
    let base = engine
        .commit(PROJECT, &main, "C1", &steps(&["A", "B"]), CommitOptions::default())
        .unwrap();
    let feature = engine
        .create_branch(PROJECT, "feature", Some(&base.id))
        .unwrap()
        .id;
    engine
        .commit(PROJECT, &feature, "C2", &steps(feature_titles), CommitOptions::default())
        .unwrap();
    engine
        .commit(PROJECT, &main, "C3", &steps(main_titles), CommitOptions::default())
        .unwrap();
    Diverged {
        engine,
        main,
        feature,
        base,
    }
}

#[test]
fn test_disjoint_changes_merge_cleanly() {
    let Diverged {
        mut engine,
        main,
        feature,
        ..
    } = diverge(&["A", "B2"], &["A2", "B"]);
    let prior_head = engine.get_branch(PROJECT, &main).unwrap().current_commit;

    let outcome = engine.merge_branches(&feature, &main).unwrap();
    let c4 = outcome.commit().expect("merge commit").clone();

    assert_eq!(titles(&engine.rollback(&c4.id).unwrap()), vec!["A2", "B2"]);
    assert_eq!(c4.parent_id.as_deref(), Some(prior_head.as_str()));
    assert!(c4.is_merge_result());
    assert_eq!(c4.message, "Merge branch 'feature' into 'main'");
    assert_eq!(engine.get_branch(PROJECT, &main).unwrap().current_commit, c4.id);
}

#[test]
fn test_same_path_conflict_is_reported_and_writes_nothing() {
    let Diverged {
        mut engine,
        main,
        feature,
        ..
    } = diverge(&["X", "B"], &["Y", "B"]);
    let main_before = engine.get_branch(PROJECT, &main).unwrap();
    let feature_before = engine.get_branch(PROJECT, &feature).unwrap();
    let commits_before = engine.get_commits(PROJECT, None).unwrap().len();

    let err = engine.merge_branches(&feature, &main).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::MergeConflict);
    assert_eq!(err.op(), Some("merge_branches"));

    let conflicts = err.conflicts().expect("conflict list");
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].path, "steps.0.title");
    assert_eq!(conflicts[0].base_value, Some(json!("A")));
    assert_eq!(conflicts[0].source_value, Some(json!("X")));
    assert_eq!(conflicts[0].target_value, Some(json!("Y")));

    assert_eq!(engine.get_branch(PROJECT, &main).unwrap(), main_before);
    assert_eq!(engine.get_branch(PROJECT, &feature).unwrap(), feature_before);
    assert_eq!(engine.get_commits(PROJECT, None).unwrap().len(), commits_before);
}

#[test]
fn test_unrelated_resolution_still_conflicts() {
    let Diverged {
        mut engine,
        main,
        feature,
        ..
    } = diverge(&["X", "B"], &["Y", "B"]);
    let err = engine
        .merge_with_resolutions(&feature, &main, &[Resolution::use_source("steps.1.title")])
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::MergeConflict);
}

#[test]
fn test_use_source_resolution_commits() {
    let Diverged {
        mut engine,
        main,
        feature,
        ..
    } = diverge(&["X", "B"], &["Y", "B"]);
    let outcome = engine
        .merge_with_resolutions(&feature, &main, &[Resolution::use_source("steps.0.title")])
        .unwrap();
    let commit = outcome.commit().expect("merge commit");
    assert_eq!(titles(&engine.rollback(&commit.id).unwrap()), vec!["X", "B"]);
}

#[test]
fn test_manual_resolution_commits_given_value() {
    let Diverged {
        mut engine,
        main,
        feature,
        ..
    } = diverge(&["X", "B"], &["Y", "B"]);
    let outcome = engine
        .merge_with_resolutions(
            &feature,
            &main,
            &[Resolution::manual("steps.0.title", json!("XY"))],
        )
        .unwrap();
    let head = outcome.head().unwrap().to_string();
    assert_eq!(titles(&engine.rollback(&head).unwrap()), vec!["XY", "B"]);
}

#[test]
fn test_fast_forward_creates_no_commit() {
    let (mut engine, main) = setup();
    let c1 = engine
        .commit(PROJECT, &main, "C1", &steps(&["A"]), CommitOptions::default())
        .unwrap();
    let feature = engine.create_branch(PROJECT, "feature", None).unwrap().id;
    let c2 = engine
        .commit(PROJECT, &feature, "C2", &steps(&["A", "B"]), CommitOptions::default())
        .unwrap();
    let commits_before = engine.get_commits(PROJECT, None).unwrap().len();

    let outcome = engine.merge_branches(&feature, &main).unwrap();
    assert_eq!(
        outcome,
        MergeOutcome::FastForward {
            from: Some(c1.id),
            to: c2.id.clone(),
        }
    );
    assert_eq!(engine.get_branch(PROJECT, &main).unwrap().current_commit, c2.id);
    assert_eq!(engine.get_commits(PROJECT, None).unwrap().len(), commits_before);
}

#[test]
fn test_fast_forward_into_unborn_target() {
    let (mut engine, main) = setup();
    let empty = engine.create_branch(PROJECT, "empty", None).unwrap().id;
    let c1 = engine
        .commit(PROJECT, &main, "C1", &steps(&["A"]), CommitOptions::default())
        .unwrap();

    let outcome = engine.merge_branches(&main, &empty).unwrap();
    assert_eq!(outcome.head(), Some(c1.id.as_str()));
    assert_eq!(engine.get_branch(PROJECT, &empty).unwrap().current_commit, c1.id);
}

#[test]
fn test_merge_already_contained_is_noop() {
    let (mut engine, main) = setup();
    engine
        .commit(PROJECT, &main, "C1", &steps(&["A"]), CommitOptions::default())
        .unwrap();
    let feature = engine.create_branch(PROJECT, "feature", None).unwrap().id;
    let c2 = engine
        .commit(PROJECT, &main, "C2", &steps(&["A", "B"]), CommitOptions::default())
        .unwrap();

    let outcome = engine.merge_branches(&feature, &main).unwrap();
    assert_eq!(
        outcome,
        MergeOutcome::UpToDate {
            head: Some(c2.id.clone())
        }
    );
    assert_eq!(engine.get_branch(PROJECT, &main).unwrap().current_commit, c2.id);
}

#[test]
fn test_merge_into_self_rejected() {
    let (mut engine, main) = setup();
    let err = engine.merge_branches(&main, &main).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidMerge);
}

#[test]
fn test_merge_unknown_branch() {
    let (mut engine, main) = setup();
    let err = engine.merge_branches("branch:ghost", &main).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::BranchNotFound);
}

#[test]
fn test_compare_diverged_branches() {
    let Diverged {
        engine,
        main,
        feature,
        base,
    } = diverge(&["X", "B"], &["Y", "B"]);

    let cmp = engine.compare_branches(&feature, &main).unwrap();
    assert_eq!(cmp.ahead, 1);
    assert_eq!(cmp.behind, 1);
    assert_eq!(cmp.common_ancestor.as_deref(), Some(base.id.as_str()));
    assert_eq!(cmp.conflicts, vec!["steps.0".to_string()]);
    assert!(!cmp.can_fast_forward());
}

#[test]
fn test_compare_predictor_is_coarser_than_merge() {
    // Different fields of the same step: compare flags the step, the merge
    // itself goes through cleanly.
    let (mut engine, main) = setup();
    let base_data = steps(&["A"]);
    let base = engine
        .commit(PROJECT, &main, "C1", &base_data, CommitOptions::default())
        .unwrap();
    let feature = engine
        .create_branch(PROJECT, "feature", Some(&base.id))
        .unwrap()
        .id;

    let with_note = base_data.clone().with_steps(vec![json!({"title": "A", "note": "n"})]);
    engine
        .commit(PROJECT, &feature, "note", &with_note, CommitOptions::default())
        .unwrap();
    engine
        .commit(PROJECT, &main, "rename", &steps(&["A2"]), CommitOptions::default())
        .unwrap();

    let cmp = engine.compare_branches(&feature, &main).unwrap();
    assert_eq!(cmp.conflicts, vec!["steps.0".to_string()]);

    let merged = engine.merge_branches(&feature, &main).unwrap();
    let data = engine.rollback(merged.head().unwrap()).unwrap();
    assert_eq!(data.steps[0], json!({"title": "A2", "note": "n"}));
}

#[test]
fn test_compare_linear_branches() {
    let (mut engine, main) = setup();
    engine
        .commit(PROJECT, &main, "C1", &steps(&["A"]), CommitOptions::default())
        .unwrap();
    let feature = engine.create_branch(PROJECT, "feature", None).unwrap().id;
    engine
        .commit(PROJECT, &feature, "C2", &steps(&["A", "B"]), CommitOptions::default())
        .unwrap();
    engine
        .commit(PROJECT, &feature, "C3", &steps(&["A", "B", "C"]), CommitOptions::default())
        .unwrap();

    let cmp = engine.compare_branches(&feature, &main).unwrap();
    assert_eq!((cmp.ahead, cmp.behind), (2, 0));
    assert!(cmp.can_fast_forward());
    assert!(cmp.conflicts.is_empty());
}

#[test]
fn test_dotted_variable_key_merges_as_one_key() {
    let (mut engine, main) = setup();
    let base_data = steps(&["A"]).with_variable("x", json!(0));
    let base = engine
        .commit(PROJECT, &main, "C1", &base_data, CommitOptions::default())
        .unwrap();
    let feature = engine
        .create_branch(PROJECT, "feature", Some(&base.id))
        .unwrap()
        .id;
    engine
        .commit(
            PROJECT,
            &feature,
            "add templated var",
            &base_data.clone().with_variable("user.name", json!("ann")),
            CommitOptions::default(),
        )
        .unwrap();
    engine
        .commit(
            PROJECT,
            &main,
            "tag owner",
            &base_data.clone().with_metadata("m", json!(true)),
            CommitOptions::default(),
        )
        .unwrap();

    let outcome = engine.merge_branches(&feature, &main).unwrap();
    let merged = engine.rollback(&outcome.commit().expect("merge commit").id).unwrap();

    assert_eq!(merged.variables.get("user.name"), Some(&json!("ann")));
    assert_eq!(merged.variables.get("x"), Some(&json!(0)));
    assert!(merged.variables.get("user").is_none());
    assert_eq!(merged.metadata.get("m"), Some(&json!(true)));
}

#[test]
fn test_append_onto_shortened_target_has_no_null_step() {
    let Diverged {
        mut engine,
        main,
        feature,
        ..
    } = diverge(&["A", "B", "C"], &["A"]);

    let outcome = engine.merge_branches(&feature, &main).unwrap();
    let merged = engine.rollback(&outcome.commit().expect("merge commit").id).unwrap();

    assert!(merged.steps.iter().all(|s| !s.is_null()));
    assert_eq!(titles(&merged), vec!["A", "C"]);
}
