// Commit pipeline: snapshots, change lists, rollback, history and the
// optional expected-head guard

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{setup, setup_with, steps, titles, PROJECT};
use serde_json::json;
use stepvc_core::errors::ExErrorKind;
use stepvc_core::logging_facility::test_capture::init_test_capture;
use stepvc_core::model::{ChangeType, ProjectConfigOverrides};
use stepvc_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use stepvc_engine::{CommitOptions, VersionEngine};
use tempfile::TempDir;

#[test]
fn test_init_creates_unborn_active_default_branch() {
    let (engine, main) = setup();
    let branch = engine.get_branch(PROJECT, &main).unwrap();
    assert_eq!(branch.name, "main");
    assert!(branch.is_active);
    assert!(branch.is_unborn());
    assert_eq!(engine.get_config(PROJECT).unwrap().author, "anonymous");
}

#[test]
fn test_init_is_idempotent_and_applies_overrides() {
    let (mut engine, main) = setup();
    let overrides = ProjectConfigOverrides {
        author: Some("ada".into()),
        max_history: Some(3),
        ..Default::default()
    };
    let config = engine.init_project(PROJECT, &overrides).unwrap();
    assert_eq!(config.author, "ada");
    assert_eq!(config.max_history, 3);

    let branches = engine.get_branches(PROJECT).unwrap();
    assert_eq!(branches.len(), 1);
    assert_eq!(branches[0].id, main);
}

#[test]
fn test_commit_rollback_round_trip() {
    let (mut engine, main) = setup();
    let data = steps(&["A", "B"])
        .with_variable("env", json!("prod"))
        .with_asset("logo", json!({"url": "x.png"}));

    let commit = engine
        .commit(PROJECT, &main, "first", &data, CommitOptions::default())
        .unwrap();

    assert_eq!(engine.rollback(&commit.id).unwrap(), data);
    assert_eq!(engine.get_snapshot(&commit.snapshot_id).unwrap().data, data);
    assert_eq!(
        engine.get_branch(PROJECT, &main).unwrap().current_commit,
        commit.id
    );
}

#[test]
fn test_first_commit_is_root_with_no_changes() {
    let (mut engine, main) = setup();
    let commit = engine
        .commit(PROJECT, &main, "first", &steps(&["A"]), CommitOptions::default())
        .unwrap();
    assert!(commit.is_root());
    assert!(commit.changes.is_empty());
    assert_eq!(commit.author, "anonymous");
}

#[test]
fn test_second_commit_records_step_changes() {
    let (mut engine, main) = setup();
    let c1 = engine
        .commit(PROJECT, &main, "one", &steps(&["A", "B"]), CommitOptions::default())
        .unwrap();
    let c2 = engine
        .commit(
            PROJECT,
            &main,
            "two",
            &steps(&["A", "B2", "C"]),
            CommitOptions::default().with_author("bob"),
        )
        .unwrap();

    assert_eq!(c2.parent_id.as_deref(), Some(c1.id.as_str()));
    assert_eq!(c2.author, "bob");
    let summary: Vec<(ChangeType, &str)> = c2
        .changes
        .iter()
        .map(|c| (c.change_type, c.path.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![(ChangeType::Modify, "steps.1"), (ChangeType::Add, "steps.2")]
    );
    assert_eq!(c2.stats.modifications, 1);
    assert_eq!(c2.stats.additions, 1);

    let diff = engine.diff_commits(&c1.id, &c2.id).unwrap();
    assert_eq!(diff, c2.changes);
}

#[test]
fn test_history_newest_first_with_limit() {
    let (mut engine, main) = setup();
    let mut ids = Vec::new();
    for i in 0..4 {
        let title = format!("v{}", i);
        let c = engine
            .commit(PROJECT, &main, &title, &steps(&[&title]), CommitOptions::default())
            .unwrap();
        ids.push(c.id);
    }

    let history = engine.get_history(PROJECT, &main, None).unwrap();
    let got: Vec<&str> = history.iter().map(|c| c.id.as_str()).collect();
    let want: Vec<&str> = ids.iter().rev().map(|s| s.as_str()).collect();
    assert_eq!(got, want);

    let limited = engine.get_history(PROJECT, &main, Some(2)).unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].id, ids[3]);

    let listed = engine.get_commits(PROJECT, Some(&main)).unwrap();
    assert_eq!(listed.len(), 4);
    assert_eq!(listed[0].id, ids[3]);
}

#[test]
fn test_expected_head_mismatch_writes_nothing() {
    let (mut engine, main) = setup();
    let c1 = engine
        .commit(PROJECT, &main, "one", &steps(&["A"]), CommitOptions::default())
        .unwrap();
    engine
        .commit(PROJECT, &main, "two", &steps(&["B"]), CommitOptions::default())
        .unwrap();

    let err = engine
        .commit(
            PROJECT,
            &main,
            "stale",
            &steps(&["C"]),
            CommitOptions::default().with_expected_head(c1.id.clone()),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::HeadMismatch);
    assert_eq!(err.op(), Some("commit"));
    assert_eq!(engine.get_commits(PROJECT, None).unwrap().len(), 2);
}

#[test]
fn test_expected_head_matching_commits() {
    let (mut engine, main) = setup();
    let c1 = engine
        .commit(
            PROJECT,
            &main,
            "one",
            &steps(&["A"]),
            CommitOptions::default().with_expected_head(""),
        )
        .unwrap();
    let c2 = engine
        .commit(
            PROJECT,
            &main,
            "two",
            &steps(&["B"]),
            CommitOptions::default().with_expected_head(c1.id.clone()),
        )
        .unwrap();
    assert_eq!(c2.parent_id, Some(c1.id));
}

#[test]
fn test_commit_to_unknown_branch() {
    let (mut engine, _) = setup();
    let err = engine
        .commit(PROJECT, "branch:nope", "x", &steps(&["A"]), CommitOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::BranchNotFound);
    assert_eq!(err.code(), "ERR_BRANCH_NOT_FOUND");
}

#[test]
fn test_branch_of_other_project_is_not_found() {
    let (mut engine, main) = setup();
    engine
        .init_project("proj-2", &ProjectConfigOverrides::default())
        .unwrap();
    let err = engine
        .commit("proj-2", &main, "x", &steps(&["A"]), CommitOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::BranchNotFound);
}

#[test]
fn test_rollback_unknown_commit() {
    let (engine, _) = setup();
    let err = engine.rollback("commit:missing").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidCommit);
}

#[test]
fn test_uninitialised_project_config() {
    let engine = VersionEngine::open_in_memory().unwrap();
    let err = engine.get_config("ghost").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ProjectNotInitialized);
}

#[test]
fn test_on_disk_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.db");

    let commit_id = {
        let mut engine = VersionEngine::open(&path).unwrap();
        engine
            .init_project(PROJECT, &ProjectConfigOverrides::default())
            .unwrap();
        let main = engine.get_active_branch(PROJECT).unwrap().unwrap();
        engine
            .commit(PROJECT, &main.id, "persist", &steps(&["A", "B"]), CommitOptions::default())
            .unwrap()
            .id
    };

    let engine = VersionEngine::open(&path).unwrap();
    assert_eq!(titles(&engine.rollback(&commit_id).unwrap()), vec!["A", "B"]);
}

#[test]
fn test_open_in_missing_directory_is_unavailable() {
    let err = VersionEngine::open("/nonexistent-stepvc/deeper/store.db").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::StoreUnavailable);
}

#[test]
fn test_commit_logs_start_and_end() {
    let capture = init_test_capture();
    let (mut engine, main) = setup_with(ProjectConfigOverrides::default());

    engine
        .commit(PROJECT, &main, "logged", &steps(&["A"]), CommitOptions::default())
        .unwrap();
    capture.assert_event_exists("commit", EVENT_START);
    capture.assert_event_exists("commit", EVENT_END);

    let _ = engine.rollback("commit:missing-for-logging");
    capture.assert_event_exists("rollback", EVENT_END_ERROR);
}
