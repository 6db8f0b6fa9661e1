// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types returned by every public SDK operation.
//!
//! Failures are a uniform triple: HTTP status (0 when no response was
//! received), a short machine code, and a human-readable message.

use serde::Serialize;
use std::fmt;

use crate::storage::StoreError;

/// Machine-readable failure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No HTTP response was obtained.
    NetworkError,
    /// Server returned `{"error": "..."}`.
    ApiError,
    /// Server returned a field-level validation list.
    ValidationError,
    /// Response body was not the expected JSON.
    ParseError,
    /// No usable token after bootstrap/refresh were exhausted.
    NotAuthenticated,
    /// Local precondition failed before any request was sent.
    InvalidArgument,
    /// Slug lookup returned zero items.
    NotFound,
    NoNextPage,
    NoPrevPage,
    FetchUnavailable,
    /// Credential storage could not be written.
    StorageError,
    /// Error body could not be decoded.
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NetworkError => "network_error",
            ErrorCode::ApiError => "api_error",
            ErrorCode::ValidationError => "validation_error",
            ErrorCode::ParseError => "parse_error",
            ErrorCode::NotAuthenticated => "not_authenticated",
            ErrorCode::InvalidArgument => "invalid_argument",
            ErrorCode::NotFound => "not_found",
            ErrorCode::NoNextPage => "no_next_page",
            ErrorCode::NoPrevPage => "no_prev_page",
            ErrorCode::FetchUnavailable => "fetch_unavailable",
            ErrorCode::StorageError => "storage_error",
            ErrorCode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure variant of the API result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{code} (status {status}): {message}")]
pub struct ApiError {
    /// HTTP status, or 0 for network failure and local storage failure.
    pub status: u16,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    /// Message used for every transport failure.
    pub const NETWORK_ERROR_MESSAGE: &'static str = "Network error: no response from server";

    pub fn new(status: u16, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn network() -> Self {
        Self::new(0, ErrorCode::NetworkError, Self::NETWORK_ERROR_MESSAGE)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(400, ErrorCode::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, ErrorCode::NotFound, message)
    }

    pub fn not_authenticated(message: impl Into<String>) -> Self {
        Self::new(401, ErrorCode::NotAuthenticated, message)
    }

    pub fn parse(status: u16, message: impl Into<String>) -> Self {
        Self::new(status, ErrorCode::ParseError, message)
    }

    pub fn no_next_page() -> Self {
        Self::new(400, ErrorCode::NoNextPage, "No next page available")
    }

    pub fn no_prev_page() -> Self {
        Self::new(400, ErrorCode::NoPrevPage, "No previous page available")
    }

    pub fn fetch_unavailable() -> Self {
        Self::new(
            400,
            ErrorCode::FetchUnavailable,
            "Page was not created with a fetch function",
        )
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::new(0, ErrorCode::StorageError, err.to_string())
    }
}

/// API result returned by every public operation.
pub type Result<T> = std::result::Result<T, ApiError>;
