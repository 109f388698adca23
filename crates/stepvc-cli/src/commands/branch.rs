//! `branch create|list|switch|delete`

use super::Context;
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct BranchArgs {
    #[command(subcommand)]
    pub command: BranchCommand,
}

#[derive(Debug, Subcommand)]
pub enum BranchCommand {
    /// Create a branch at a commit (defaults to the active head)
    Create {
        name: String,
        #[arg(long)]
        from: Option<String>,
    },
    List,
    /// Make a branch the active one
    Switch { name: String },
    Delete { name: String },
}

pub fn execute(ctx: &Context, args: BranchArgs) -> Result<()> {
    let mut engine = ctx.open()?;
    match args.command {
        BranchCommand::Create { name, from } => {
            let branch = engine.create_branch(&ctx.project, &name, from.as_deref())?;
            match branch.head() {
                Some(head) => println!("Created branch {} at {}", branch.name, head),
                None => println!("Created branch {} (no commits)", branch.name),
            }
        }
        BranchCommand::List => {
            for branch in engine.get_branches(&ctx.project)? {
                let marker = if branch.is_active { "*" } else { " " };
                println!("{} {} {}", marker, branch.name, branch.head().unwrap_or("-"));
            }
        }
        BranchCommand::Switch { name } => {
            let branch = ctx.branch(&engine, Some(name.as_str()))?;
            engine.switch_branch(&ctx.project, &branch.id)?;
            println!("Switched to branch {}", name);
        }
        BranchCommand::Delete { name } => {
            let branch = ctx.branch(&engine, Some(name.as_str()))?;
            engine.delete_branch(&ctx.project, &branch.id)?;
            println!("Deleted branch {}", name);
        }
    }
    Ok(())
}
