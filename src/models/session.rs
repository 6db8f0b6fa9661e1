// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Session bootstrap/refresh acknowledgement.

use serde::Deserialize;

/// Server response to a session bootstrap or refresh call.
///
/// Consumed immediately to update stored credentials; never retained.
#[derive(Clone, Deserialize)]
pub struct Session {
    /// Device/session ID
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub status: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub access_token: String,
    pub refresh_token: String,
}

// Token values must never reach logs.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("game_id", &self.game_id)
            .field("account_id", &self.account_id)
            .field("status", &self.status)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// One-time nonce for mutating requests.
#[derive(Debug, Clone, Deserialize)]
pub struct NonceResponse {
    pub nonce_value: String,
}
