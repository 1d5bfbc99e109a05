//! Log subscriber setup for the CLI.
//!
//! Logs go to stderr so stdout carries only the report. `RUST_LOG` takes
//! precedence over the `--verbose` flag.

use tracing_subscriber::EnvFilter;

/// Verbosity selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Warnings and the per-run summary
    #[default]
    Normal,
    /// Per-team progress and HTTP requests
    Verbose,
    /// Request bodies
    Trace,
}

impl LogLevel {
    /// Map repeated `-v` flags to a level.
    pub fn from_occurrences(count: u8) -> Self {
        match count {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }

    /// Default filter directives when `RUST_LOG` is unset.
    pub fn directives(&self) -> &'static str {
        match self {
            Self::Normal => "warn,teamsync_core=info,teamsync_cli=info",
            Self::Verbose => "info,teamsync_core=debug,teamsync_connector_rest=debug,teamsync_cli=debug",
            Self::Trace => "debug,teamsync_core=trace,teamsync_connector_rest=trace,teamsync_cli=trace",
        }
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directives()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
