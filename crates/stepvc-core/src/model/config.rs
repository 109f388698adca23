use serde::{Deserialize, Serialize};

/// Per-project versioning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project_id: String,
    pub default_branch: String,
    pub author: String,
    /// Commits retained per branch by cleanup; 0 disables pruning
    pub max_history: usize,
    pub compress_old_commits: bool,
    pub auto_commit: bool,
    pub commit_interval_secs: u64,
}

impl ProjectConfig {
    pub const DEFAULT_BRANCH: &'static str = "main";
    pub const DEFAULT_AUTHOR: &'static str = "anonymous";
    pub const DEFAULT_MAX_HISTORY: usize = 100;
    pub const DEFAULT_COMMIT_INTERVAL_SECS: u64 = 300;

    /// Defaults for a freshly initialised project
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            default_branch: Self::DEFAULT_BRANCH.to_string(),
            author: Self::DEFAULT_AUTHOR.to_string(),
            max_history: Self::DEFAULT_MAX_HISTORY,
            compress_old_commits: false,
            auto_commit: false,
            commit_interval_secs: Self::DEFAULT_COMMIT_INTERVAL_SECS,
        }
    }

    /// Apply overrides on top of this config
    pub fn apply(mut self, overrides: &ProjectConfigOverrides) -> Self {
        if let Some(v) = &overrides.default_branch {
            self.default_branch = v.clone();
        }
        if let Some(v) = &overrides.author {
            self.author = v.clone();
        }
        if let Some(v) = overrides.max_history {
            self.max_history = v;
        }
        if let Some(v) = overrides.compress_old_commits {
            self.compress_old_commits = v;
        }
        if let Some(v) = overrides.auto_commit {
            self.auto_commit = v;
        }
        if let Some(v) = overrides.commit_interval_secs {
            self.commit_interval_secs = v;
        }
        self
    }

    /// True when cleanup should prune history
    pub fn retention_enabled(&self) -> bool {
        self.max_history > 0
    }
}

/// Partial config used by `init_project` and `update_config`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfigOverrides {
    pub default_branch: Option<String>,
    pub author: Option<String>,
    pub max_history: Option<usize>,
    pub compress_old_commits: Option<bool>,
    pub auto_commit: Option<bool>,
    pub commit_interval_secs: Option<u64>,
}
