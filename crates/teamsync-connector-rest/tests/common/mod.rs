//! Shared helpers for REST collaborator tests.

#![allow(dead_code)]

use std::sync::Once;

use serde_json::{json, Value};
use teamsync_connector_rest::{RestConfig, RetryConfig};
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

static INIT: Once = Once::new();

/// Initialize logging for tests (once).
pub fn init_test_logging() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init()
                .ok();
        }
    });
}

pub async fn setup_mock_server() -> MockServer {
    init_test_logging();
    MockServer::start().await
}

/// Authenticated config with retries disabled.
pub fn create_config(server: &MockServer) -> RestConfig {
    RestConfig::new(server.uri())
        .with_bearer_token(TOKEN)
        .with_retry(RetryConfig::disabled())
}

pub fn bearer() -> String {
    format!("Bearer {TOKEN}")
}

pub fn person_json(id: u64, username: &str) -> Value {
    json!({ "id": id, "username": username })
}

pub fn group_json(id: u64, handle: &str, name: &str, members: &[u64]) -> Value {
    json!({
        "id": id,
        "handle": handle,
        "name": name,
        "members": members,
        "external": false
    })
}

pub fn groups_response(groups: Vec<Value>) -> Value {
    json!({ "groups": groups })
}
