// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP transport for the leaderboard API.
//!
//! Handles:
//! - URL construction from the configured base URL
//! - JSON request bodies and caller-supplied headers
//! - A uniform response envelope (status 0 when no response arrived)
//! - Mapping error bodies to [`ApiError`]
//! - Optional request logging with credential headers redacted

use crate::config::ClientConfig;
use crate::error::{ApiError, ErrorCode};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;

/// Tracing target for transport operations.
pub const TRACING_TARGET: &str = "leadr_sdk::transport";

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const NONCE_HEADER: &str = "leadr-client-nonce";

const REDACTED: &str = "[REDACTED]";

/// Request headers by name.
pub type Headers = BTreeMap<String, String>;

/// Uniform response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status, or 0 if the request never completed
    pub status: u16,
    /// Raw response body (or the transport error description)
    pub body: String,
    /// Whether an HTTP response was received at all, even an error one
    pub network_success: bool,
}

impl Response {
    /// A response that was received from the server.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            network_success: true,
        }
    }

    /// A request that never produced an HTTP response.
    pub fn network_failure(description: impl Into<String>) -> Self {
        Self {
            status: 0,
            body: description.into(),
            network_success: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.network_success && (200..300).contains(&self.status)
    }

    /// Best-effort decode of the body as a JSON object.
    pub fn parse_json(&self) -> Option<Value> {
        if self.body.trim().is_empty() {
            return None;
        }
        serde_json::from_str::<Value>(&self.body)
            .ok()
            .filter(Value::is_object)
    }

    /// Map a failed response to the error triple.
    pub fn to_error(&self) -> ApiError {
        if !self.network_success || self.status == 0 {
            return ApiError::network();
        }

        let unknown = || {
            let message = if self.body.trim().is_empty() {
                format!("HTTP {}", self.status)
            } else {
                self.body.clone()
            };
            ApiError::new(self.status, ErrorCode::Unknown, message)
        };

        let Some(json) = self.parse_json() else {
            return unknown();
        };

        match json.get("error") {
            Some(Value::String(message)) => {
                ApiError::new(self.status, ErrorCode::ApiError, message.clone())
            }
            Some(Value::Array(items)) => {
                let message = items
                    .first()
                    .and_then(|item| item.get("msg"))
                    .and_then(Value::as_str)
                    .unwrap_or("Validation failed");
                ApiError::new(self.status, ErrorCode::ValidationError, message)
            }
            _ => unknown(),
        }
    }
}

/// Sends requests to the leaderboard service.
///
/// Implementations never fail: transport errors are reported as a
/// [`Response`] with status 0.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, headers: &Headers) -> Response;

    async fn post(&self, path: &str, body: Option<&Value>, headers: &Headers) -> Response;
}

/// Join a base URL and a path, unless the path is already absolute.
pub fn build_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Headers whose values must never be logged.
pub fn is_sensitive_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    ["authorization", "nonce", "token", "cookie", "secret"]
        .iter()
        .any(|needle| name.contains(needle))
}

/// Copy of `headers` with sensitive values replaced.
pub fn redact_headers(headers: &Headers) -> Headers {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if is_sensitive_header(name) {
                REDACTED.to_string()
            } else {
                value.clone()
            };
            (name.clone(), value)
        })
        .collect()
}

/// Single-line request description safe for logs.
pub fn describe_request(method: &str, path: &str, headers: &Headers) -> String {
    let rendered: Vec<String> = redact_headers(headers)
        .into_iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect();
    format!("{} {} [{}]", method, path, rendered.join(", "))
}

/// reqwest-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    debug_logging: bool,
}

impl HttpTransport {
    /// Create a transport for the configured base URL.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("leadr-sdk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            debug_logging: config.debug_logging,
        })
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Value>,
        headers: &Headers,
    ) -> Response {
        let url = build_url(&self.base_url, path);
        let started_at = Instant::now();

        if self.debug_logging {
            tracing::debug!(
                target: TRACING_TARGET,
                request = %describe_request(method.as_str(), path, headers),
                "Sending request"
            );
        }

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                let description = if e.is_timeout() {
                    "Request timed out".to_string()
                } else if e.is_connect() {
                    "Connection failed".to_string()
                } else {
                    e.to_string()
                };
                tracing::warn!(
                    target: TRACING_TARGET,
                    method = %method,
                    path,
                    error = %description,
                    elapsed_ms = started_at.elapsed().as_millis() as u64,
                    "Request failed before a response was received"
                );
                return Response::network_failure(description);
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(target: TRACING_TARGET, error = %e, status, "Failed to read response body");
                String::new()
            }
        };

        if self.debug_logging {
            tracing::debug!(
                target: TRACING_TARGET,
                method = %method,
                path,
                status,
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "Received response"
            );
        }

        if status == 429 {
            tracing::warn!(target: TRACING_TARGET, path, "Leaderboard rate limit hit (429)");
        }

        Response::new(status, body)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, headers: &Headers) -> Response {
        self.send(reqwest::Method::GET, path, None, headers).await
    }

    async fn post(&self, path: &str, body: Option<&Value>, headers: &Headers) -> Response {
        self.send(reqwest::Method::POST, path, body, headers).await
    }
}
