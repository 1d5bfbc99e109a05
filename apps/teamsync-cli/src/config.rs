//! Runtime configuration from environment variables.

use teamsync_connector_rest::RestConfig;

pub const DIRECTORY_URL: &str = "TEAMSYNC_DIRECTORY_URL";
pub const DIRECTORY_TOKEN: &str = "TEAMSYNC_DIRECTORY_TOKEN";
pub const GROUPS_URL: &str = "TEAMSYNC_GROUPS_URL";
pub const GROUPS_TOKEN: &str = "TEAMSYNC_GROUPS_TOKEN";
pub const TIMEOUT_SECS: &str = "TEAMSYNC_TIMEOUT_SECS";
pub const DRY_RUN: &str = "TEAMSYNC_DRY_RUN";

/// Connection settings for one sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Person directory endpoint.
    pub directory: RestConfig,

    /// Group-management API endpoint.
    pub groups: RestConfig,

    /// Report changes without applying them.
    pub dry_run: bool,
}

impl SyncConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// This allows tests to supply variables without mutating process-global
    /// environment state.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let timeout_secs = match reader(TIMEOUT_SECS) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue(TIMEOUT_SECS.into(), e.to_string()))?,
            Err(_) => 30,
        };

        let dry_run = match reader(DRY_RUN) {
            Ok(raw) => parse_flag(&raw)
                .ok_or_else(|| ConfigError::InvalidValue(DRY_RUN.into(), raw.clone()))?,
            Err(_) => false,
        };

        let directory = endpoint(&reader, DIRECTORY_URL, DIRECTORY_TOKEN, timeout_secs)?;
        let groups = endpoint(&reader, GROUPS_URL, GROUPS_TOKEN, timeout_secs)?;

        Ok(Self {
            directory,
            groups,
            dry_run,
        })
    }
}

fn endpoint<F>(
    reader: &F,
    url_var: &str,
    token_var: &str,
    timeout_secs: u64,
) -> Result<RestConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let url = reader(url_var).map_err(|_| ConfigError::MissingVar(url_var.into()))?;

    let mut config = RestConfig::new(url).with_timeout_secs(timeout_secs);
    if let Ok(token) = reader(token_var) {
        if !token.trim().is_empty() {
            config = config.with_bearer_token(token.trim());
        }
    }

    config
        .validate()
        .map_err(|e| ConfigError::InvalidValue(url_var.into(), e.to_string()))?;
    Ok(config)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
