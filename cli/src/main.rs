use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::process::ExitCode;
mod logging;
mod skills;
mod status;

use skills::SelectionArgs;

#[derive(Parser)]
#[command(name = "skillsctl", version)]
#[command(about = "Vendor selected skills from a shared repository via git sparse-checkout", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all available skills
    Catalog {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Suggest skills based on query
    Suggest {
        /// Search query
        query: String,
        /// Max results
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Install skills
    Install(SelectionArgs),
    /// Remove skills
    Remove(SelectionArgs),
    /// Set exact skill list
    Set(SelectionArgs),
    /// Sync skills from manifest
    Sync {
        /// Stage git changes
        #[arg(long)]
        stage: bool,
    },
    /// Show current status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check environment and configuration
    Doctor,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    };

    let root = std::env::current_dir().context("Failed to resolve current directory")?;

    match command {
        Commands::Catalog { json } => skills::catalog(&root, json),
        Commands::Suggest { query, limit, json } => skills::suggest(&root, &query, limit, json),
        Commands::Install(args) => skills::install(&root, args).await,
        Commands::Remove(args) => skills::remove(&root, args).await,
        Commands::Set(args) => skills::set(&root, args).await,
        Commands::Sync { stage } => skills::sync(&root, stage).await,
        Commands::Status { json } => status::status(&root, json).await,
        Commands::Doctor => status::doctor(&root).await,
    }
}
