//! Release command handlers
//!
//! Fetches a dashboard snapshot and renders it as a tree.

use anyhow::{Context, Result};
use colored::*;
use reldash_client::{DashboardClient, ReleaseQuery};
use reldash_core::dto::{ReleaseNode, Snapshot, StageNode, StepNode};

use crate::config::Config;

/// Fetch and print the release snapshot
pub async fn show_releases(
    config: &Config,
    path_ids: Vec<i32>,
    count: Option<u32>,
    json: bool,
) -> Result<()> {
    let client = DashboardClient::new(&config.server_url);

    let query = ReleaseQuery {
        release_path_ids: path_ids.into_iter().collect(),
        release_count: count,
    };

    let snapshot = client
        .get_releases(&query)
        .await
        .context("Failed to fetch release snapshot")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }

    Ok(())
}

fn print_snapshot(snapshot: &Snapshot) {
    println!(
        "{} {}",
        "Releases as of".bold(),
        snapshot
            .last_refresh
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .bold()
    );
    println!();

    if snapshot.releases.is_empty() {
        println!("{}", "No releases found.".yellow());
        return;
    }

    for release in &snapshot.releases {
        print_release(release);
    }
}

fn print_release(release: &ReleaseNode) {
    println!(
        "{} {} [{}]",
        "▸".cyan(),
        release.name.bold(),
        colorize_status(&release.status)
    );
    println!("    Path:    {}", release.release_path_name.dimmed());
    println!(
        "    Created: {}",
        release
            .created_on
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );

    if release.stages.is_empty() {
        println!("    {}", "(no stages yet)".dimmed());
    }
    for stage in &release.stages {
        print_stage(stage, stage.id == release.target_stage_id);
    }
    println!();
}

fn print_stage(stage: &StageNode, is_target: bool) {
    let marker = if is_target { " ◎ target".cyan().to_string() } else { String::new() };
    println!(
        "    {} {} {}{}",
        "├─".dimmed(),
        stage.name.bold(),
        format!("({})", stage.environment).dimmed(),
        marker
    );

    for step in &stage.steps {
        print_step(step);
    }
}

fn print_step(step: &StepNode) {
    println!(
        "    │   {} {} {}",
        format!("{}.", step.rank).dimmed(),
        step.name,
        colorize_status(&step.status)
    );
}

/// Color a status name by what it most likely means
fn colorize_status(status: &str) -> ColoredString {
    let lower = status.to_ascii_lowercase();
    if ["fail", "reject", "abandon", "error", "cancel"]
        .iter()
        .any(|word| lower.contains(word))
    {
        status.red()
    } else if ["progress", "running", "pending", "waiting"]
        .iter()
        .any(|word| lower.contains(word))
    {
        status.cyan()
    } else if ["done", "released", "success", "succeeded", "complete", "approved"]
        .iter()
        .any(|word| lower.contains(word))
    {
        status.green()
    } else {
        status.yellow()
    }
}
