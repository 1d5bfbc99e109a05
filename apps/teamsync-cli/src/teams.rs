//! Team declaration file (YAML).
//!
//! ```yaml
//! version: "1"
//! teams:
//!   - name: infra
//!     display_name: Infrastructure
//!     group: true
//!     maintainers: [alice]
//!     members: [bob, https://github.com/carol]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use teamsync_core::model::{GroupHandle, Team};

use crate::error::{CliError, CliResult};

/// Supported file format version.
pub const SUPPORTED_VERSION: &str = "1";

/// Parsed team file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamFile {
    pub version: String,
    #[serde(default)]
    pub teams: Vec<Team>,
}

impl TeamFile {
    /// Keep only the named teams. Unknown names are a validation error.
    pub fn select(self, names: &[String]) -> CliResult<Vec<Team>> {
        if names.is_empty() {
            return Ok(self.teams);
        }

        for name in names {
            if !self.teams.iter().any(|t| &t.name == name) {
                return Err(CliError::Validation(format!(
                    "Team '{name}' is not declared in the team file"
                )));
            }
        }

        Ok(self
            .teams
            .into_iter()
            .filter(|t| names.contains(&t.name))
            .collect())
    }
}

/// Load and parse a team file.
pub fn load_team_file(path: &Path) -> CliResult<TeamFile> {
    if !path.exists() {
        return Err(CliError::Validation(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("Failed to read file {}: {}", path.display(), e)))?;

    parse_team_file(&content)
}

/// Parse team file content.
pub fn parse_team_file(content: &str) -> CliResult<TeamFile> {
    serde_yaml::from_str(content).map_err(|e| {
        let location = if let Some(loc) = e.location() {
            format!(" at line {}, column {}", loc.line(), loc.column())
        } else {
            String::new()
        };
        CliError::Validation(format!("Invalid YAML{location}: {e}"))
    })
}

/// Validate a parsed team file.
pub fn validate_team_file(file: &TeamFile) -> CliResult<()> {
    if file.version != SUPPORTED_VERSION {
        return Err(CliError::Validation(format!(
            "Unsupported team file version '{}'. Only version '{SUPPORTED_VERSION}' is supported.",
            file.version
        )));
    }

    let mut names = HashSet::new();
    let mut handles = HashSet::new();

    for team in &file.teams {
        if team.name.trim().is_empty() {
            return Err(CliError::Validation("Team name is required".to_string()));
        }
        if !names.insert(team.name.as_str()) {
            return Err(CliError::Validation(format!(
                "Duplicate team name '{}'",
                team.name
            )));
        }

        if let Some(GroupHandle::Named(handle)) = &team.group {
            if handle.trim().is_empty() {
                return Err(CliError::Validation(format!(
                    "Team '{}': group handle must not be empty",
                    team.name
                )));
            }
        }

        if let Some(handle) = team.handle() {
            if !handles.insert(handle) {
                return Err(CliError::Validation(format!(
                    "Team '{}': group handle '{handle}' is already used by another team",
                    team.name
                )));
            }
        }
    }

    Ok(())
}
