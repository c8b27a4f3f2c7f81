//! Release Dashboard CLI
//!
//! Command-line interface for viewing the release dashboard.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "reldash")]
#[command(about = "Release pipeline dashboard CLI", long_about = None)]
struct Cli {
    /// Dashboard server URL
    #[arg(long, env = "RELDASH_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config { server_url: cli.url };

    handle_command(cli.command, &config).await
}
