// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "metoikos")]
#[command(about = "One-way migration of a legacy archive platform to its successor")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new metoikos.yml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Run the feasibility prechecks and checks without migrating
    Check {
        /// This invocation is the background migration job itself
        #[arg(long)]
        background_job: bool,
    },

    /// Validate the environment, then run the full migration pipeline
    Migrate {
        /// This invocation is the background migration job itself
        #[arg(long)]
        background_job: bool,
    },
}
