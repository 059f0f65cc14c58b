//! Minimal HTTP client for a W3C WebDriver server.

use crate::{AppError, AppResult};

use std::{
    panic::Location,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use keyremote_core::{CoreError, CoreResult};
use reqwest::Method;
use serde_json::{Value, json};
use tracing::{debug, instrument};

/// Upper bound for a single WebDriver round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delay between readiness probes while the server starts.
const READY_PROBE_INTERVAL: Duration = Duration::from_millis(100);

/// Session-agnostic WebDriver HTTP client.
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: reqwest::Client,
    base_url: String,
}

impl WebDriverClient {
    /// Create a client for the server at `base_url`.
    #[track_caller]
    pub fn new(base_url: &str) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::WebDriver {
                reason: format!("Failed to build HTTP client: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Poll `/status` until the server reports ready or `timeout` elapses.
    #[instrument(skip(self))]
    pub async fn wait_until_ready(&self, timeout: Duration) -> AppResult<()> {
        let deadline = Instant::now() + timeout;

        loop {
            let last_error = match self.send(Method::GET, "/status", None).await {
                Ok(status) if status.get("ready").and_then(Value::as_bool) != Some(false) => {
                    debug!("WebDriver server ready");
                    return Ok(());
                }
                Ok(status) => format!("server not ready: {}", status),
                Err(e) => e.to_string(),
            };

            if Instant::now() >= deadline {
                return Err(AppError::WebDriver {
                    reason: format!(
                        "WebDriver server at {} not ready after {:?}: {}",
                        self.base_url, timeout, last_error
                    ),
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            tokio::time::sleep(READY_PROBE_INTERVAL).await;
        }
    }

    /// Start a session and return its id.
    #[instrument(skip_all)]
    pub async fn new_session(&self, capabilities: Value) -> CoreResult<String> {
        let value = self.send(Method::POST, "/session", Some(capabilities)).await?;

        value
            .get("sessionId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| CoreError::Driver {
                reason: format!("New session response has no sessionId: {}", value),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Run a command against `session_id` and return the response `value`.
    pub async fn command(
        &self,
        method: Method,
        session_id: &str,
        path: &str,
        body: Option<Value>,
    ) -> CoreResult<Value> {
        let path = format!("/session/{}{}", session_id, path);
        self.send(method, &path, body).await
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> CoreResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);

        // POST commands carry a JSON body even when they take no parameters.
        if method == Method::POST {
            request = request.json(&body.unwrap_or_else(|| json!({})));
        }

        let response = request.send().await.map_err(|e| CoreError::Driver {
            reason: format!("{} {} failed: {}", method, path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let status = response.status();
        let payload: Value = response.json().await.map_err(|e| CoreError::Driver {
            reason: format!("{} {} returned invalid JSON: {}", method, path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let value = payload.get("value").cloned().unwrap_or(Value::Null);

        if !status.is_success() {
            return Err(CoreError::Driver {
                reason: format!(
                    "{} {} returned {}: {}",
                    method,
                    path,
                    status,
                    super::protocol::error_message(&value)
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(value)
    }
}
