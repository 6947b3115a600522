// ABOUTME: Entry point for the metoikos CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use metoikos::error::Result;
use metoikos::params::{self, ParameterSet};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { force } => {
            let cwd = env::current_dir()?;
            params::init_config(&cwd, force)
        }
        Commands::Check { background_job } => {
            let cwd = env::current_dir()?;
            let params = ParameterSet::discover(&cwd)?;
            commands::check(params, background_job).await
        }
        Commands::Migrate { background_job } => {
            let cwd = env::current_dir()?;
            let params = ParameterSet::discover(&cwd)?;
            commands::migrate(params, background_job).await
        }
    }
}
