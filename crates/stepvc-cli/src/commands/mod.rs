//! Subcommand implementations and the helpers they share

pub mod branch;
pub mod history;
pub mod merge;
pub mod project;
pub mod restore;
pub mod tag;

use anyhow::{anyhow, Context as _, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use stepvc_core::model::{Branch, ProjectData};
use stepvc_engine::VersionEngine;

/// Options every subcommand accepts
#[derive(Debug, Clone, Args)]
pub struct Context {
    /// SQLite store path
    #[arg(long, global = true, default_value = ".stepvc/store.db")]
    pub db: PathBuf,

    /// Project id
    #[arg(long, global = true, default_value = "default")]
    pub project: String,
}

impl Context {
    /// Open the store, creating its directory on first use
    pub fn open(&self) -> Result<VersionEngine> {
        if let Some(parent) = self.db.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        Ok(VersionEngine::open(&self.db)?)
    }

    /// Branch by name, or the active branch when no name is given
    pub fn branch(&self, engine: &VersionEngine, name: Option<&str>) -> Result<Branch> {
        match name {
            Some(name) => Ok(engine.get_branch_by_name(&self.project, name)?),
            None => engine
                .get_active_branch(&self.project)?
                .ok_or_else(|| anyhow!("project '{}' has no active branch; run `stepvc init`", self.project)),
        }
    }
}

pub fn read_project_data(path: &Path) -> Result<ProjectData> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid project data", path.display()))
}

