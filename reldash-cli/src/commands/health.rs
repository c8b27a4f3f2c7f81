//! Health command handler

use anyhow::{Context, Result};
use colored::*;
use reldash_client::DashboardClient;

use crate::config::Config;

/// Check that the dashboard server responds
pub async fn check_health(config: &Config) -> Result<()> {
    let client = DashboardClient::new(&config.server_url);

    client
        .health()
        .await
        .with_context(|| format!("Dashboard server at {} is not healthy", config.server_url))?;

    println!("{} {}", "✓".green(), format!("{} is up", config.server_url).bold());
    Ok(())
}
