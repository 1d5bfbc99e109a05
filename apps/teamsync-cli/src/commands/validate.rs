//! Validate a team file without contacting any remote system

use std::path::PathBuf;

use clap::Args;

use crate::error::CliResult;
use crate::output::render_team_list;
use crate::teams::{load_team_file, validate_team_file};

/// Validate a team file
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the team file
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,
}

/// Execute the validate command
pub async fn execute(args: ValidateArgs) -> CliResult<()> {
    let file = load_team_file(&args.file)?;
    validate_team_file(&file)?;

    println!(
        "{} is valid: {} team(s)",
        args.file.display(),
        file.teams.len()
    );
    print!("{}", render_team_list(&file.teams));
    Ok(())
}
