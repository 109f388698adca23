//! `commit`, `log`, `show` and `diff`

use super::{read_project_data, Context};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use stepvc_core::diff::render_change_summary;
use stepvc_engine::CommitOptions;

#[derive(Debug, Args)]
pub struct CommitArgs {
    /// JSON file holding the project data
    #[arg(long, short = 'f')]
    pub file: PathBuf,

    #[arg(long, short = 'm')]
    pub message: String,

    /// Branch name (defaults to the active branch)
    #[arg(long)]
    pub branch: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    /// Refuse to commit unless the branch head is this commit
    #[arg(long)]
    pub expected_head: Option<String>,
}

pub fn commit(ctx: &Context, args: CommitArgs) -> Result<()> {
    let data = read_project_data(&args.file)?;
    let mut engine = ctx.open()?;
    let branch = ctx.branch(&engine, args.branch.as_deref())?;

    let mut options = CommitOptions::default();
    if let Some(author) = args.author {
        options = options.with_author(author);
    }
    if let Some(head) = args.expected_head {
        options = options.with_expected_head(head);
    }

    let commit = engine.commit(&ctx.project, &branch.id, &args.message, &data, options)?;
    println!("Committed {} on {}", commit.id, branch.name);
    println!(
        "  +{} ~{} -{}",
        commit.stats.additions, commit.stats.modifications, commit.stats.deletions
    );
    Ok(())
}

#[derive(Debug, Args)]
pub struct LogArgs {
    #[arg(long)]
    pub branch: Option<String>,

    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Print commits as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn log(ctx: &Context, args: LogArgs) -> Result<()> {
    let engine = ctx.open()?;
    let branch = ctx.branch(&engine, args.branch.as_deref())?;
    let history = engine.get_history(&ctx.project, &branch.id, args.limit)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }
    for commit in &history {
        println!("commit {}", commit.id);
        if let Some(merged) = &commit.merge_parent_id {
            println!("Merged: {}", merged);
        }
        println!("Author: {}", commit.author);
        println!("Date:   {}", commit.timestamp.to_rfc3339());
        println!();
        println!("    {}", commit.message);
        println!();
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub commit: String,
}

pub fn show(ctx: &Context, args: ShowArgs) -> Result<()> {
    let engine = ctx.open()?;
    let data = engine.rollback(&args.commit)?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    pub from: String,
    pub to: String,

    /// Print the change list as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

pub fn diff(ctx: &Context, args: DiffArgs) -> Result<()> {
    let engine = ctx.open()?;
    let changes = engine.diff_commits(&args.from, &args.to)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
    } else {
        print!("{}", render_change_summary(&changes));
    }
    Ok(())
}
