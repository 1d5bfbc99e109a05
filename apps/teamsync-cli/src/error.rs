//! CLI error types and exit codes

use teamsync_core::SourceError;
use thiserror::Error;

use crate::config::ConfigError;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error (including a run with failed teams)
/// - 3: Network error
/// - 4: Validation or configuration error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("{failed} team(s) failed to sync")]
    SyncFailed { failed: usize },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Network(_) => 3,
            CliError::Validation(_) | CliError::Config(_) => 4,
            CliError::Io(_) | CliError::SyncFailed { .. } => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {self}");
        } else {
            eprintln!("Error: {self}");
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {suggestion}");
            } else {
                eprintln!("\nSuggestion: {suggestion}");
            }
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Config(_) => {
                Some("Set TEAMSYNC_DIRECTORY_URL and TEAMSYNC_GROUPS_URL, or add them to .env.")
            }
            CliError::Network(_) => Some("Check that both APIs are reachable and try again."),
            CliError::SyncFailed { .. } => {
                Some("Re-run with --verbose or RUST_LOG=debug for details.")
            }
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<SourceError> for CliError {
    fn from(e: SourceError) -> Self {
        if e.is_transient() {
            CliError::Network(e.to_string())
        } else if matches!(e, SourceError::InvalidConfiguration { .. }) {
            CliError::Config(e.to_string())
        } else {
            CliError::Validation(e.to_string())
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Io(format!("JSON error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Network("down".into()).exit_code(), 3);
        assert_eq!(CliError::Validation("bad".into()).exit_code(), 4);
        assert_eq!(CliError::Config("missing".into()).exit_code(), 4);
        assert_eq!(CliError::Io("disk".into()).exit_code(), 1);
        assert_eq!(CliError::SyncFailed { failed: 2 }.exit_code(), 1);
    }

    #[test]
    fn test_transient_source_error_is_network() {
        let err: CliError = SourceError::Unavailable {
            message: "503".into(),
        }
        .into();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_invalid_configuration_is_config() {
        let err: CliError = SourceError::InvalidConfiguration {
            message: "bad url".into(),
        }
        .into();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_sync_failed_display() {
        assert_eq!(
            CliError::SyncFailed { failed: 3 }.to_string(),
            "3 team(s) failed to sync"
        );
    }
}
