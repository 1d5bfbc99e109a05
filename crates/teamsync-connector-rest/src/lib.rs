//! # REST Connector
//!
//! REST implementations of the team sync collaborators: the person
//! directory ([`RestDirectory`]) and the group-management API
//! ([`RestGroupApi`]).
//!
//! ## Features
//!
//! - Bearer-token authentication
//! - Configurable timeout
//! - Retry with exponential backoff for idempotent requests
//! - HTTP status mapped onto the [`teamsync_core::SourceError`] taxonomy
//!
//! ## Example
//!
//! ```ignore
//! use teamsync_connector_rest::{RestConfig, RestDirectory, RestGroupApi};
//!
//! let directory = RestDirectory::new(
//!     RestConfig::new("https://people.example.com/api").with_bearer_token(token),
//! )?;
//! let groups = RestGroupApi::new(RestConfig::new("https://chat.example.com/api"))?;
//! ```

pub mod client;
pub mod config;
pub mod directory;
pub mod groups;
pub mod retry;
mod wire;

// Re-exports
pub use client::RestClient;
pub use config::RestConfig;
pub use directory::RestDirectory;
pub use groups::RestGroupApi;
pub use retry::RetryConfig;
