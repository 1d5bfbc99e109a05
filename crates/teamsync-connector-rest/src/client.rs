//! Shared HTTP plumbing: request building, retries and status mapping.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use teamsync_core::error::{SourceError, SourceResult};
use tracing::{debug, trace, warn};

use crate::config::RestConfig;
use crate::retry::parse_retry_after;

/// Authenticated JSON client bound to one base URL.
#[derive(Clone)]
pub struct RestClient {
    config: RestConfig,
    client: Arc<Client>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("config", &self.config)
            .finish()
    }
}

impl RestClient {
    /// Validate the configuration and build the HTTP client.
    pub fn new(config: RestConfig) -> SourceResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SourceError::InvalidConfiguration {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    fn build_request(&self, method: Method, url: &str, body: Option<&Value>) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        if let Some(json) = body {
            request = request.json(json);
        }
        request
    }

    /// Send a request and return the successful response.
    ///
    /// POST is never retried: a create that timed out may still have landed.
    pub async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> SourceResult<Response> {
        let url = self.config.endpoint(path);
        let retry = &self.config.retry;
        let retryable = method != Method::POST;
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(url = %url, method = %method, attempt, "sending request");
            if let Some(json) = body {
                trace!(body = %json, "request body");
            }

            let result = self.build_request(method.clone(), &url, body).send().await;
            let can_retry = retryable && attempt <= retry.max_retries;

            match result {
                Ok(response) => {
                    let status = response.status();
                    debug!(url = %url, status = %status, attempt, "received response");

                    if status.is_success() {
                        return Ok(response);
                    }

                    if can_retry && retry.should_retry(status.as_u16()) {
                        let wait = response
                            .headers()
                            .get(header::RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .and_then(parse_retry_after)
                            .unwrap_or_else(|| retry.calculate_backoff(attempt))
                            .min(Duration::from_millis(retry.max_backoff_ms));
                        warn!(
                            url = %url,
                            status = %status,
                            attempt,
                            wait_ms = millis(wait),
                            "transient error, retrying"
                        );
                        tokio::time::sleep(wait).await;
                        continue;
                    }

                    let text = response.text().await.unwrap_or_default();
                    return Err(handle_response_error(status, &text, path));
                }
                Err(e) => {
                    if can_retry {
                        let wait = retry.calculate_backoff(attempt);
                        warn!(
                            url = %url,
                            error = %e,
                            attempt,
                            wait_ms = millis(wait),
                            "request failed, retrying"
                        );
                        tokio::time::sleep(wait).await;
                        continue;
                    }

                    if e.is_timeout() {
                        return Err(SourceError::Timeout {
                            timeout_secs: self.config.timeout_secs,
                        });
                    }
                    return Err(SourceError::connection_failed_with_source(
                        format!("request failed after {attempt} attempts: {url}"),
                        e,
                    ));
                }
            }
        }
    }

    /// GET a path and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> SourceResult<T> {
        let response = self.send(Method::GET, path, None).await?;
        decode(response).await
    }

    /// Send a JSON body and decode the JSON response.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &Value,
    ) -> SourceResult<T> {
        let response = self.send(method, path, Some(body)).await?;
        decode(response).await
    }

    /// Send a JSON body, ignoring any response body.
    pub async fn send_no_content(&self, method: Method, path: &str, body: &Value) -> SourceResult<()> {
        self.send(method, path, Some(body)).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> SourceResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| SourceError::connection_failed_with_source("failed to read response body", e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| SourceError::invalid_data(format!("unexpected response body: {e}")))
}

/// Map an unsuccessful HTTP status to a collaborator error.
/// Whole milliseconds in `d`, saturating at `u64::MAX`.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

pub(crate) fn handle_response_error(status: StatusCode, body: &str, path: &str) -> SourceError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("message")
                .or_else(|| json.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED => SourceError::AuthenticationFailed,
        StatusCode::FORBIDDEN => SourceError::AuthorizationFailed {
            operation: path.to_string(),
        },
        StatusCode::NOT_FOUND => SourceError::NotFound {
            identifier: path.to_string(),
        },
        StatusCode::CONFLICT => SourceError::AlreadyExists {
            identifier: path.to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => SourceError::Unavailable {
            message: format!("rate limited: {message}"),
        },
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            SourceError::Unavailable { message }
        }
        _ => SourceError::operation_failed(format!("HTTP {status}: {message}")),
    }
}
