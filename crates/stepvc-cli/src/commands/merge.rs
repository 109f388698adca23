//! `compare` and `merge`

use super::Context;
use anyhow::Result;
use clap::Args;
use stepvc_core::errors::ExErrorKind;
use stepvc_core::model::Resolution;
use stepvc_engine::MergeOutcome;

#[derive(Debug, Args)]
pub struct CompareArgs {
    pub source: String,
    pub target: String,
}

pub fn compare(ctx: &Context, args: CompareArgs) -> Result<()> {
    let engine = ctx.open()?;
    let source = ctx.branch(&engine, Some(args.source.as_str()))?;
    let target = ctx.branch(&engine, Some(args.target.as_str()))?;
    let cmp = engine.compare_branches(&source.id, &target.id)?;

    println!("{} is {} ahead, {} behind {}", source.name, cmp.ahead, cmp.behind, target.name);
    if let Some(ancestor) = &cmp.common_ancestor {
        println!("  common ancestor: {}", ancestor);
    }
    for path in &cmp.conflicts {
        println!("  may conflict: {}", path);
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Branch to merge from
    pub source: String,

    /// Branch to merge into (defaults to the active branch)
    #[arg(long)]
    pub into: Option<String>,

    /// Resolve a conflicting path with the source's value
    #[arg(long = "use-source", value_name = "PATH")]
    pub use_source: Vec<String>,

    /// Resolve a conflicting path with the target's value
    #[arg(long = "use-target", value_name = "PATH")]
    pub use_target: Vec<String>,

    /// Resolve a conflicting path with the common ancestor's value
    #[arg(long = "use-base", value_name = "PATH")]
    pub use_base: Vec<String>,
}

pub fn merge(ctx: &Context, args: MergeArgs) -> Result<()> {
    let mut engine = ctx.open()?;
    let source = ctx.branch(&engine, Some(args.source.as_str()))?;
    let target = ctx.branch(&engine, args.into.as_deref())?;

    let resolutions: Vec<Resolution> = args
        .use_source
        .into_iter()
        .map(Resolution::use_source)
        .chain(args.use_target.into_iter().map(Resolution::use_target))
        .chain(args.use_base.into_iter().map(Resolution::use_base))
        .collect();

    match engine.merge_with_resolutions(&source.id, &target.id, &resolutions) {
        Ok(MergeOutcome::UpToDate { .. }) => println!("Already up to date"),
        Ok(MergeOutcome::FastForward { to, .. }) => {
            println!("Fast-forwarded {} to {}", target.name, to)
        }
        Ok(MergeOutcome::Merged { commit }) => {
            println!("Merged {} into {}: {}", source.name, target.name, commit.id)
        }
        Err(e) if e.kind() == ExErrorKind::MergeConflict => {
            for conflict in e.conflicts().unwrap_or_default() {
                eprintln!(
                    "CONFLICT {}: base={} source={} target={}",
                    conflict.path,
                    render(conflict.base_value.as_ref()),
                    render(conflict.source_value.as_ref()),
                    render(conflict.target_value.as_ref()),
                );
            }
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn render(value: Option<&serde_json::Value>) -> String {
    value.map_or_else(|| "(absent)".to_string(), |v| v.to_string())
}
