//! Reconcile declared teams with the remote group system

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use teamsync_connector_rest::{RestDirectory, RestGroupApi};
use teamsync_core::prelude::*;
use tracing::info;

use crate::config::SyncConfig;
use crate::error::{CliError, CliResult};
use crate::output::print_report;
use crate::teams::{load_team_file, validate_team_file};

/// Reconcile teams with the remote group system
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to the team file
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,

    /// Report changes without applying them
    #[arg(long)]
    pub dry_run: bool,

    /// Only sync the named team (repeatable)
    #[arg(long = "team", value_name = "NAME")]
    pub teams: Vec<String>,

    /// Output the run report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the sync command
pub async fn execute(args: SyncArgs) -> CliResult<()> {
    let config = SyncConfig::from_env()?;
    let report = run(&args, config).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.has_failures() {
        return Err(CliError::SyncFailed {
            failed: report.summary.failed,
        });
    }

    Ok(())
}

/// Load the team file and run one reconciliation pass.
pub async fn run(args: &SyncArgs, config: SyncConfig) -> CliResult<RunReport> {
    let file = load_team_file(&args.file)?;
    validate_team_file(&file)?;
    let teams = file.select(&args.teams)?;

    let mode = ExecutionMode::from_dry_run(args.dry_run || config.dry_run);
    let directory = Arc::new(RestDirectory::new(config.directory)?);
    let groups = Arc::new(RestGroupApi::new(config.groups)?);

    let runner = SyncRunner::new()
        .with_target(Box::new(GroupReconciler::new(directory, groups, mode)));

    info!(
        teams = teams.len(),
        targets = ?runner.target_names(),
        dry_run = mode.is_dry_run(),
        "starting sync"
    );

    Ok(runner.run(&teams, &TracingSink).await)
}
