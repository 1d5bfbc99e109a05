//! Team sync error types
//!
//! Collaborator errors carry a transient/permanent classification; the
//! reconciliation errors wrap them with the team context needed for reporting.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Result type for collaborator (directory / group API) calls.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for reconciliation.
pub type SyncResult<T> = Result<T, SyncError>;

/// Error returned by a directory or group collaborator.
#[derive(Debug, Error)]
pub enum SourceError {
    // Connection errors (usually transient)
    /// Failed to establish a connection to the remote system.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request timed out.
    #[error("request timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Remote system is temporarily unavailable (rate limited, 5xx).
    #[error("remote system unavailable: {message}")]
    Unavailable { message: String },

    // Authentication errors (permanent)
    /// Credentials were rejected.
    #[error("authentication failed: invalid credentials")]
    AuthenticationFailed,

    /// Credentials are valid but lack permission.
    #[error("authorization failed: insufficient permissions for {operation}")]
    AuthorizationFailed { operation: String },

    // Object errors
    /// Object not found in the remote system.
    #[error("object not found: {identifier}")]
    NotFound { identifier: String },

    /// Object already exists in the remote system.
    #[error("object already exists: {identifier}")]
    AlreadyExists { identifier: String },

    /// Response could not be interpreted.
    #[error("invalid data: {message}")]
    InvalidData { message: String },

    /// Operation was rejected for any other reason.
    #[error("operation failed: {message}")]
    OperationFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Collaborator is misconfigured.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl SourceError {
    /// Check if this error is transient and a later run may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SourceError::ConnectionFailed { .. }
                | SourceError::Timeout { .. }
                | SourceError::Unavailable { .. }
        )
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            SourceError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            SourceError::Timeout { .. } => "TIMEOUT",
            SourceError::Unavailable { .. } => "UNAVAILABLE",
            SourceError::AuthenticationFailed => "AUTH_FAILED",
            SourceError::AuthorizationFailed { .. } => "AUTHORIZATION_FAILED",
            SourceError::NotFound { .. } => "NOT_FOUND",
            SourceError::AlreadyExists { .. } => "ALREADY_EXISTS",
            SourceError::InvalidData { .. } => "INVALID_DATA",
            SourceError::OperationFailed { .. } => "OPERATION_FAILED",
            SourceError::InvalidConfiguration { .. } => "INVALID_CONFIG",
        }
    }

    // Convenience constructors

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        SourceError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SourceError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an operation failed error.
    pub fn operation_failed(message: impl Into<String>) -> Self {
        SourceError::OperationFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create an operation failed error with source.
    pub fn operation_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SourceError::OperationFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        SourceError::InvalidData {
            message: message.into(),
        }
    }
}

/// Mutating group operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOperation {
    Create,
    Rename,
    SetMembers,
}

impl GroupOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupOperation::Create => "create",
            GroupOperation::Rename => "rename",
            GroupOperation::SetMembers => "set_members",
        }
    }
}

impl fmt::Display for GroupOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised while reconciling one team.
///
/// Load failures are shared (`Arc`) because the caches memoize them and hand
/// the same cause to every later team of the run.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// The person directory could not be loaded.
    #[error("failed to load person directory: {cause}")]
    DirectoryLoad {
        #[source]
        cause: Arc<SourceError>,
    },

    /// The remote group list could not be fetched.
    #[error("failed to list remote groups: {cause}")]
    GroupList {
        #[source]
        cause: Arc<SourceError>,
    },

    /// A create / rename / set-members call failed for one team.
    #[error("failed to {operation} group '{handle}' for team '{team}': {source}")]
    GroupMutation {
        team: String,
        handle: String,
        operation: GroupOperation,
        #[source]
        source: Arc<SourceError>,
    },
}

impl SyncError {
    /// Whether the failure affects every team of the run, not just this one.
    pub fn aborts_run(&self) -> bool {
        matches!(
            self,
            SyncError::DirectoryLoad { .. } | SyncError::GroupList { .. }
        )
    }

    /// Create a group mutation error.
    pub fn mutation(
        team: impl Into<String>,
        handle: impl Into<String>,
        operation: GroupOperation,
        source: SourceError,
    ) -> Self {
        SyncError::GroupMutation {
            team: team.into(),
            handle: handle.into(),
            operation,
            source: Arc::new(source),
        }
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            SyncError::DirectoryLoad { .. } => "DIRECTORY_LOAD_FAILED",
            SyncError::GroupList { .. } => "GROUP_LIST_FAILED",
            SyncError::GroupMutation { .. } => "GROUP_MUTATION_FAILED",
        }
    }
}
