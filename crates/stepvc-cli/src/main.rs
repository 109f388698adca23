//! stepvc CLI
//!
//! Command-line interface for versioning step-based project documents

use clap::{Parser, Subcommand, ValueEnum};
use stepvc_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "stepvc")]
#[command(about = "stepvc - Version control for step-based projects", long_about = None)]
struct Cli {
    #[command(flatten)]
    ctx: commands::Context,

    /// Emit logs to stderr (RUST_LOG overrides the level)
    #[arg(long, global = true, value_enum)]
    log: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Initialise a project and its default branch
    Init(commands::project::InitArgs),
    /// Commit project data from a JSON file
    Commit(commands::history::CommitArgs),
    /// Show a branch's history
    Log(commands::history::LogArgs),
    /// Print the project data of a commit
    Show(commands::history::ShowArgs),
    /// Changes between two commits
    Diff(commands::history::DiffArgs),
    /// Branch operations
    Branch(commands::branch::BranchArgs),
    /// Tag operations
    Tag(commands::tag::TagArgs),
    /// Ahead/behind counts and likely conflicts between two branches
    Compare(commands::merge::CompareArgs),
    /// Merge a branch into another
    Merge(commands::merge::MergeArgs),
    /// Restore a single path from an older commit
    Restore(commands::restore::RestoreArgs),
    /// Prune history beyond the configured maximum
    Cleanup,
}

fn main() {
    let cli = Cli::parse();

    match cli.log {
        Some(LogFormat::Pretty) => init(Profile::Development),
        Some(LogFormat::Json) => init(Profile::Production),
        None => init(Profile::Quiet),
    }

    let ctx = cli.ctx;
    let result = match cli.command {
        Commands::Init(args) => commands::project::init_project(&ctx, args),
        Commands::Commit(args) => commands::history::commit(&ctx, args),
        Commands::Log(args) => commands::history::log(&ctx, args),
        Commands::Show(args) => commands::history::show(&ctx, args),
        Commands::Diff(args) => commands::history::diff(&ctx, args),
        Commands::Branch(args) => commands::branch::execute(&ctx, args),
        Commands::Tag(args) => commands::tag::execute(&ctx, args),
        Commands::Compare(args) => commands::merge::compare(&ctx, args),
        Commands::Merge(args) => commands::merge::merge(&ctx, args),
        Commands::Restore(args) => commands::restore::execute(&ctx, args),
        Commands::Cleanup => commands::project::cleanup(&ctx),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
