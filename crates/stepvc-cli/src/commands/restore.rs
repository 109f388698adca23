//! `restore preview|apply`

use super::Context;
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct RestoreArgs {
    #[command(subcommand)]
    pub command: RestoreCommand,
}

#[derive(Debug, Args)]
pub struct RestoreTarget {
    /// Dot path, e.g. `steps.0.title`
    pub path: String,

    /// Commit to take the value from
    #[arg(long)]
    pub from: String,

    /// Branch to restore onto (defaults to the active branch)
    #[arg(long)]
    pub branch: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum RestoreCommand {
    /// Show the historical and current value without writing
    Preview(RestoreTarget),
    /// Restore the value and commit the result
    Apply(RestoreTarget),
}

pub fn execute(ctx: &Context, args: RestoreArgs) -> Result<()> {
    let mut engine = ctx.open()?;
    match args.command {
        RestoreCommand::Preview(target) => {
            let branch = ctx.branch(&engine, target.branch.as_deref())?;
            let preview =
                engine.preview_restore_from_commit(&ctx.project, &branch.id, &target.path, &target.from)?;
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
        RestoreCommand::Apply(target) => {
            let branch = ctx.branch(&engine, target.branch.as_deref())?;
            let commit =
                engine.restore_path_from_commit(&ctx.project, &branch.id, &target.path, &target.from)?;
            println!("Restored {} from {}: {}", target.path, target.from, commit.id);
        }
    }
    Ok(())
}
