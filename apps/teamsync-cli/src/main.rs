//! teamsync - keep chat/code-hosting groups in line with declared teams
//!
//! Reads a YAML team file, resolves usernames through the person directory
//! and creates, renames or re-populates remote groups to match.

use clap::{Parser, Subcommand};

use teamsync_cli::commands;
use teamsync_cli::error::CliResult;
use teamsync_cli::logging::{self, LogLevel};

/// teamsync - team membership reconciliation
#[derive(Parser)]
#[command(name = "teamsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile teams with the remote group system
    Sync(commands::sync::SyncArgs),

    /// Validate a team file
    Validate(commands::validate::ValidateArgs),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(LogLevel::from_occurrences(cli.verbose));

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Sync(args) => commands::sync::execute(args).await,
        Commands::Validate(args) => commands::validate::execute(args).await,
    }
}
