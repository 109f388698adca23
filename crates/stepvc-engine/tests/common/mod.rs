#![allow(dead_code)]

use serde_json::{json, Value};
use stepvc_core::model::{ProjectConfigOverrides, ProjectData};
use stepvc_engine::VersionEngine;

pub const PROJECT: &str = "proj-1";

/// In-memory engine with `PROJECT` initialised; returns the main branch id
pub fn setup() -> (VersionEngine, String) {
    setup_with(ProjectConfigOverrides::default())
}

pub fn setup_with(overrides: ProjectConfigOverrides) -> (VersionEngine, String) {
    let mut engine = VersionEngine::open_in_memory().unwrap();
    engine.init_project(PROJECT, &overrides).unwrap();
    let main = engine.get_active_branch(PROJECT).unwrap().unwrap();
    (engine, main.id)
}

pub fn step(title: &str) -> Value {
    json!({ "title": title })
}

pub fn steps(titles: &[&str]) -> ProjectData {
    ProjectData::new().with_steps(titles.iter().map(|t| step(t)).collect())
}

pub fn titles(data: &ProjectData) -> Vec<String> {
    data.steps
        .iter()
        .map(|s| s["title"].as_str().unwrap_or_default().to_string())
        .collect()
}
