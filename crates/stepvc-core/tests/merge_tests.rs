#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::{json, Value};
use stepvc_core::merge::{predict_conflicts, three_way_merge};
use stepvc_core::model::{ProjectData, Resolution};

fn titled(titles: &[&str]) -> ProjectData {
    ProjectData::new().with_steps(titles.iter().map(|t| json!({ "title": t })).collect())
}

#[test]
fn test_scenario_disjoint_titles() {
    let base = titled(&["A", "B"]);
    let feature = titled(&["A", "B2"]);
    let main = titled(&["A2", "B"]);

    let result = three_way_merge(&base, &feature, &main, &[]).unwrap();

    assert!(result.conflicts.is_empty());
    assert_eq!(result.merged, titled(&["A2", "B2"]));
}

#[test]
fn test_scenario_same_title_conflict() {
    let base = titled(&["A"]);
    let feature = titled(&["X"]);
    let main = titled(&["Y"]);

    let result = three_way_merge(&base, &feature, &main, &[]).unwrap();

    assert_eq!(result.conflicts.len(), 1);
    let conflict = &result.conflicts[0];
    assert_eq!(conflict.path, "steps.0.title");
    assert_eq!(conflict.base_value, Some(json!("A")));
    assert_eq!(conflict.source_value, Some(json!("X")));
    assert_eq!(conflict.target_value, Some(json!("Y")));
    // The unresolved merge still leaves the target value in place.
    assert_eq!(result.merged, main);
}

#[test]
fn test_each_resolution_strategy() {
    let base = titled(&["A"]);
    let source = titled(&["X"]);
    let target = titled(&["Y"]);
    let cases: Vec<(Resolution, Value)> = vec![
        (Resolution::use_source("steps.0.title"), json!("X")),
        (Resolution::use_target("steps.0.title"), json!("Y")),
        (Resolution::use_base("steps.0.title"), json!("A")),
        (Resolution::manual("steps.0.title", json!("M")), json!("M")),
    ];

    for (resolution, expected) in cases {
        let result = three_way_merge(&base, &source, &target, &[resolution]).unwrap();
        assert!(result.conflicts.is_empty());
        assert_eq!(result.resolved.len(), 1);
        assert_eq!(result.merged.steps[0]["title"], expected);
    }
}

#[test]
fn test_resolution_for_other_path_leaves_conflict() {
    let base = titled(&["A"]).with_variable("v", json!(1));
    let source = titled(&["X"]).with_variable("v", json!(2));
    let target = titled(&["Y"]).with_variable("v", json!(3));

    let result =
        three_way_merge(&base, &source, &target, &[Resolution::use_source("variables.v")]).unwrap();

    assert_eq!(result.conflicts.len(), 1);
    assert_eq!(result.conflicts[0].path, "steps.0.title");
    assert_eq!(result.merged.variables["v"], json!(2));
}

#[test]
fn test_source_deletes_key_target_untouched() {
    let base = ProjectData::new()
        .with_variable("a", json!(1))
        .with_variable("b", json!(2));
    let source = ProjectData::new().with_variable("a", json!(1));
    let target = base.clone().with_metadata("note", json!("hi"));

    let result = three_way_merge(&base, &source, &target, &[]).unwrap();

    assert!(result.conflicts.is_empty());
    assert!(!result.merged.variables.contains_key("b"));
    assert_eq!(result.merged.metadata["note"], json!("hi"));
}

#[test]
fn test_delete_versus_modify_conflicts() {
    let base = ProjectData::new().with_variable("a", json!(1));
    let source = ProjectData::new();
    let target = ProjectData::new().with_variable("a", json!(5));

    let result = three_way_merge(&base, &source, &target, &[]).unwrap();

    assert_eq!(result.conflicts.len(), 1);
    assert_eq!(result.conflicts[0].source_value, None);
    assert_eq!(result.conflicts[0].target_value, Some(json!(5)));
}

#[test]
fn test_disjoint_changes_keep_both_sides() {
    let base = titled(&["A", "B", "C"]);
    let source = titled(&["A", "B", "C"])
        .with_variable("src", json!(true))
        .with_metadata("owner", json!("s"));
    let target = titled(&["A", "B!", "C"]).with_asset("img", json!("x.png"));

    let result = three_way_merge(&base, &source, &target, &[]).unwrap();

    assert!(result.is_clean());
    assert_eq!(result.merged.steps[1]["title"], json!("B!"));
    assert_eq!(result.merged.variables["src"], json!(true));
    assert_eq!(result.merged.metadata["owner"], json!("s"));
    assert_eq!(result.merged.assets.as_ref().unwrap()["img"], json!("x.png"));
}

#[test]
fn test_predictor_is_coarser_than_merge() {
    let base = ProjectData::new().with_steps(vec![json!({"title": "A", "body": "b"})]);
    let source = ProjectData::new().with_steps(vec![json!({"title": "A2", "body": "b"})]);
    let target = ProjectData::new().with_steps(vec![json!({"title": "A", "body": "b2"})]);

    assert_eq!(predict_conflicts(&base, &source, &target), vec!["steps.0".to_string()]);
    assert!(three_way_merge(&base, &source, &target, &[])
        .unwrap()
        .is_clean());
}
