//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod health;
mod releases;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the most recent releases with their stages and steps
    Releases {
        /// Only show releases on these release paths (comma-separated ids)
        #[arg(short, long, value_delimiter = ',')]
        path_ids: Vec<i32>,

        /// Number of releases to show (server default: 5)
        #[arg(short, long)]
        count: Option<u32>,

        /// Print the raw JSON snapshot
        #[arg(long)]
        json: bool,
    },
    /// Check that the dashboard server is up
    Health,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Releases {
            path_ids,
            count,
            json,
        } => releases::show_releases(config, path_ids, count, json).await,
        Commands::Health => health::check_health(config).await,
    }
}
