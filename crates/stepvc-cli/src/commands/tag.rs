//! `tag create|list`

use super::Context;
use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TagArgs {
    #[command(subcommand)]
    pub command: TagCommand,
}

#[derive(Debug, Subcommand)]
pub enum TagCommand {
    /// Tag a commit (defaults to the active head); a message makes it annotated
    Create {
        name: String,
        #[arg(long)]
        commit: Option<String>,
        #[arg(long, short = 'm')]
        message: Option<String>,
    },
    List,
}

pub fn execute(ctx: &Context, args: TagArgs) -> Result<()> {
    let engine = ctx.open()?;
    match args.command {
        TagCommand::Create {
            name,
            commit,
            message,
        } => {
            let commit_id = match commit {
                Some(id) => id,
                None => ctx
                    .branch(&engine, None)?
                    .head()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!("active branch has no commits to tag"))?,
            };
            let tag = engine.create_tag(&ctx.project, &name, &commit_id, message.as_deref())?;
            println!("Tagged {} as {} ({})", tag.commit_id, tag.name, tag.tag_type.as_str());
        }
        TagCommand::List => {
            for tag in engine.get_tags(&ctx.project)? {
                match &tag.message {
                    Some(message) => println!("{} {} {}", tag.name, tag.commit_id, message),
                    None => println!("{} {}", tag.name, tag.commit_id),
                }
            }
        }
    }
    Ok(())
}
