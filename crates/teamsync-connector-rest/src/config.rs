//! REST collaborator configuration
//!
//! One `RestConfig` describes one remote endpoint (the person directory or
//! the group API). Tokens never appear in `Debug` output.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use teamsync_core::error::{SourceError, SourceResult};
use url::Url;

use crate::retry::RetryConfig;

/// Connection settings for one REST endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct RestConfig {
    /// Base URL, e.g. "https://directory.example.com/api".
    pub base_url: String,

    /// Bearer token sent as `Authorization: Bearer <token>`.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry behavior for idempotent requests.
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_timeout_secs() -> u64 {
    30
}

impl std::fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***REDACTED***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("retry", &self.retry)
            .finish()
    }
}

impl RestConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout_secs: default_timeout_secs(),
            retry: RetryConfig::default(),
        }
    }

    /// Authenticate with a bearer token.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> SourceResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(SourceError::InvalidConfiguration {
                message: "base_url is required".to_string(),
            });
        }

        let url = Url::parse(&self.base_url).map_err(|e| SourceError::InvalidConfiguration {
            message: format!("invalid base_url '{}': {e}", self.base_url),
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SourceError::InvalidConfiguration {
                message: format!("unsupported scheme: {}", url.scheme()),
            });
        }

        if self.timeout_secs == 0 {
            return Err(SourceError::InvalidConfiguration {
                message: "timeout_secs must be greater than zero".to_string(),
            });
        }

        if matches!(&self.token, Some(t) if t.trim().is_empty()) {
            return Err(SourceError::InvalidConfiguration {
                message: "token must not be empty when set".to_string(),
            });
        }

        Ok(())
    }

    /// Build the full URL for a path below the base URL.
    ///
    /// Path segments are appended verbatim; callers percent-encode ids.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RestConfig::new("https://groups.example.com");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        assert!(RestConfig::new("").validate().is_err());
        assert!(RestConfig::new("not a url").validate().is_err());
        assert!(RestConfig::new("ftp://groups.example.com")
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let err = RestConfig::new("https://groups.example.com")
            .with_timeout_secs(0)
            .validate()
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_validate_rejects_blank_token() {
        let config = RestConfig::new("https://groups.example.com").with_bearer_token("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_joins_slashes() {
        let config = RestConfig::new("https://groups.example.com/api/");
        assert_eq!(
            config.endpoint("/groups"),
            "https://groups.example.com/api/groups"
        );
        assert_eq!(
            config.endpoint("groups/7/members"),
            "https://groups.example.com/api/groups/7/members"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config =
            RestConfig::new("https://groups.example.com").with_bearer_token("super-secret-token");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_token_is_not_serialized() {
        let config =
            RestConfig::new("https://groups.example.com").with_bearer_token("super-secret-token");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret-token"));
    }
}
