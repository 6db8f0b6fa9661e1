// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! LEADR leaderboard SDK
//!
//! Client for a hosted leaderboard service: list boards, page through
//! scores, and submit scores. Sessions are bootstrapped from a per-device
//! fingerprint and refreshed transparently; score submissions are protected
//! by one-time nonces.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod time_utils;

pub use config::ClientConfig;
pub use error::{ApiError, ErrorCode, Result};
pub use services::{LeadrClient, Page, SessionManager, SessionState};
