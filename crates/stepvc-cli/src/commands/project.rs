//! `init` and `cleanup`

use super::Context;
use anyhow::Result;
use clap::Args;
use stepvc_core::model::ProjectConfigOverrides;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Name of the default branch
    #[arg(long)]
    pub default_branch: Option<String>,

    /// Default commit author
    #[arg(long)]
    pub author: Option<String>,

    /// Commits kept per branch by `cleanup` (0 keeps everything)
    #[arg(long)]
    pub max_history: Option<usize>,
}

pub fn init_project(ctx: &Context, args: InitArgs) -> Result<()> {
    let mut engine = ctx.open()?;
    let overrides = ProjectConfigOverrides {
        default_branch: args.default_branch,
        author: args.author,
        max_history: args.max_history,
        ..Default::default()
    };
    let config = engine.init_project(&ctx.project, &overrides)?;

    println!("Initialised project '{}'", config.project_id);
    println!("  default_branch: {}", config.default_branch);
    println!("  author: {}", config.author);
    println!("  max_history: {}", config.max_history);
    Ok(())
}

pub fn cleanup(ctx: &Context) -> Result<()> {
    let mut engine = ctx.open()?;
    let report = engine.cleanup(&ctx.project)?;
    println!(
        "Removed {} commits and {} snapshots across {} branches",
        report.commits_removed, report.snapshots_removed, report.branches_pruned
    );
    Ok(())
}
