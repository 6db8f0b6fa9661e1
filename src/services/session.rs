// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle for the leaderboard API.
//!
//! Handles:
//! - Session bootstrap from the device fingerprint
//! - Token refresh, proactive (near expiry) and reactive (on 401)
//! - One-time nonces for mutating calls (re-fetched on 412)
//! - A single refresh lock so concurrent callers never duplicate a refresh

use crate::error::{ApiError, Result};
use crate::models::{NonceResponse, Session};
use crate::services::transport::{Headers, Response, Transport, AUTHORIZATION_HEADER, NONCE_HEADER};
use crate::storage::CredentialStore;
use chrono::{Duration, Utc};
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Tracing target for session operations.
pub const TRACING_TARGET: &str = "leadr_sdk::session";

/// Margin before token expiration when we proactively refresh (2 minutes).
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 2 * 60;

/// Session endpoints.
pub mod endpoints {
    pub const SESSIONS: &str = "/v1/client/sessions";
    pub const REFRESH: &str = "/v1/client/sessions/refresh";
    pub const NONCE: &str = "/v1/client/nonce";
}

/// Held while a refresh or bootstrap is in flight.
type RefreshGuard<'a> = MutexGuard<'a, ()>;

/// Authentication state inferred from stored credentials and the refresh lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No usable access token and no refresh token.
    Unauthenticated,
    /// Access token valid and outside the refresh margin.
    Fresh,
    /// Access token still valid but inside the refresh margin.
    Stale,
    /// Access token missing or expired, refresh token held.
    Expired,
    /// A credential update (refresh, bootstrap or sign-out) is in flight.
    Refreshing,
}

/// Owns the token lifecycle and wraps every authenticated request.
///
/// All credential writes go through this type. Concurrent callers serialize
/// on one refresh lock and re-check token state after acquiring it, so at
/// most one refresh or bootstrap happens per expiry window.
pub struct SessionManager {
    transport: Arc<dyn Transport>,
    credentials: CredentialStore,
    game_id: String,
    /// Serializes refresh and bootstrap.
    refresh_lock: Mutex<()>,
    /// Refresh/bootstrap round-trips completed, successful or not.
    attempts: AtomicU64,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("game_id", &self.game_id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

fn refresh_margin() -> Duration {
    Duration::seconds(TOKEN_REFRESH_MARGIN_SECS)
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

impl SessionManager {
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: CredentialStore,
        game_id: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            credentials,
            game_id: game_id.into(),
            refresh_lock: Mutex::new(()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Current inferred state.
    pub fn state(&self) -> SessionState {
        if self.refresh_lock.try_lock().is_err() {
            return SessionState::Refreshing;
        }

        let now = Utc::now();
        if self.credentials.has_valid_token_at(now) {
            if self.credentials.is_token_expiring_soon_at(refresh_margin(), now) {
                SessionState::Stale
            } else {
                SessionState::Fresh
            }
        } else if self.credentials.get_refresh_token().is_some() {
            SessionState::Expired
        } else {
            SessionState::Unauthenticated
        }
    }

    pub fn token_expires_at(&self) -> Option<chrono::DateTime<Utc>> {
        self.credentials.get_expires_at()
    }

    // ─── Session Bootstrap & Refresh ─────────────────────────────────────────

    /// Create a new session for this device and store its tokens.
    pub async fn start_session(&self) -> Result<Session> {
        let guard = self.refresh_lock.lock().await;
        self.bootstrap(&guard).await
    }

    /// Exchange the stored refresh token for a new token pair.
    ///
    /// Any failure, including a transport failure, clears the stored tokens so
    /// the next call bootstraps.
    pub async fn refresh_token(&self) -> Result<bool> {
        let guard = self.refresh_lock.lock().await;
        self.refresh(&guard).await
    }

    /// Forget the current session. The device fingerprint is kept.
    pub async fn clear_session(&self) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;
        self.credentials.clear_tokens()?;
        tracing::info!(target: TRACING_TARGET, "Session cleared");
        Ok(())
    }

    async fn bootstrap(&self, _guard: &RefreshGuard<'_>) -> Result<Session> {
        let fingerprint = self.credentials.get_or_create_fingerprint()?;
        let body = serde_json::json!({
            "game_id": self.game_id,
            "client_fingerprint": fingerprint,
        });

        tracing::debug!(target: TRACING_TARGET, game_id = %self.game_id, "Starting session");

        let response = self
            .transport
            .post(endpoints::SESSIONS, Some(&body), &Headers::new())
            .await;
        self.attempts.fetch_add(1, Ordering::AcqRel);

        if !response.is_success() {
            let err = response.to_error();
            tracing::warn!(target: TRACING_TARGET, error = %err, "Session bootstrap failed");
            return Err(err);
        }

        let session = parse_session(&response)?;
        self.store_session(&session, response.status)?;

        tracing::info!(
            target: TRACING_TARGET,
            session_id = %session.id,
            account_id = %session.account_id,
            expires_in = session.expires_in,
            "Session started"
        );
        Ok(session)
    }

    async fn refresh(&self, _guard: &RefreshGuard<'_>) -> Result<bool> {
        let refresh_token = self
            .credentials
            .get_refresh_token()
            .ok_or_else(|| ApiError::not_authenticated("No refresh token available"))?;

        let mut headers = Headers::new();
        headers.insert(AUTHORIZATION_HEADER.to_string(), bearer(&refresh_token));

        let response = self.transport.post(endpoints::REFRESH, None, &headers).await;
        self.attempts.fetch_add(1, Ordering::AcqRel);

        if !response.is_success() {
            let err = response.to_error();
            tracing::warn!(
                target: TRACING_TARGET,
                error = %err,
                network_success = response.network_success,
                "Token refresh failed, clearing stored tokens"
            );
            self.credentials.clear_tokens()?;
            return Err(err);
        }

        let session = parse_session(&response)?;
        self.store_session(&session, response.status)?;

        tracing::info!(
            target: TRACING_TARGET,
            expires_in = session.expires_in,
            "Token refreshed"
        );
        Ok(true)
    }

    fn store_session(&self, session: &Session, status: u16) -> Result<()> {
        let expires_at = Duration::try_seconds(session.expires_in.max(0))
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| ApiError::parse(status, format!("Invalid expires_in: {}", session.expires_in)))?;
        self.credentials
            .save_tokens(&session.access_token, &session.refresh_token, expires_at)?;
        Ok(())
    }

    // ─── Token Management ────────────────────────────────────────────────────

    /// Make sure a valid access token is stored, refreshing or bootstrapping if needed.
    ///
    /// 1. Fast path: token valid and outside the refresh margin (no lock)
    /// 2. Acquire the refresh lock
    /// 3. Re-check (another caller may have refreshed while we waited); if
    ///    another caller already made an attempt that failed, report that
    ///    instead of repeating it
    /// 4. Refresh if a refresh token is held (proactively if still valid)
    /// 5. Bootstrap a new session if there is still no valid token
    pub async fn ensure_authenticated(&self) -> Result<()> {
        if self.credentials.has_valid_token()
            && !self.credentials.is_token_expiring_soon(refresh_margin())
        {
            return Ok(());
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let guard = self.refresh_lock.lock().await;

        let now = Utc::now();
        let valid = self.credentials.has_valid_token_at(now);
        if valid && !self.credentials.is_token_expiring_soon_at(refresh_margin(), now) {
            return Ok(());
        }

        if self.attempts.load(Ordering::Acquire) != seen {
            if valid {
                return Ok(());
            }
            tracing::debug!(target: TRACING_TARGET, "Concurrent re-authentication failed, not repeating it");
            return Err(ApiError::not_authenticated("Session could not be re-established"));
        }

        if valid || self.credentials.get_refresh_token().is_some() {
            if valid {
                tracing::debug!(target: TRACING_TARGET, "Access token expiring soon, refreshing");
            } else {
                tracing::debug!(target: TRACING_TARGET, "Access token expired, refreshing");
            }

            if let Err(e) = self.refresh(&guard).await {
                tracing::warn!(target: TRACING_TARGET, error = %e, "Refresh failed");
            }
            if self.credentials.has_valid_token() {
                return Ok(());
            }
        }

        self.bootstrap(&guard).await.map(|_| ())
    }

    /// Fetch a one-time nonce for a mutating request.
    pub async fn get_nonce(&self) -> Result<String> {
        self.ensure_authenticated().await?;
        let access_token = self
            .valid_access_token()
            .ok_or_else(|| ApiError::not_authenticated("No access token available"))?;
        self.fetch_nonce(&access_token).await
    }

    async fn fetch_nonce(&self, access_token: &str) -> Result<String> {
        let mut headers = Headers::new();
        headers.insert(AUTHORIZATION_HEADER.to_string(), bearer(access_token));

        let response = self.transport.get(endpoints::NONCE, &headers).await;
        if !response.is_success() {
            let err = response.to_error();
            tracing::warn!(target: TRACING_TARGET, error = %err, "Nonce request failed");
            return Err(err);
        }

        let json = response
            .parse_json()
            .ok_or_else(|| ApiError::parse(response.status, "Nonce response was not a JSON object"))?;
        let nonce: NonceResponse = serde_json::from_value(json)
            .map_err(|e| ApiError::parse(response.status, format!("Invalid nonce response: {}", e)))?;
        Ok(nonce.nonce_value)
    }

    fn valid_access_token(&self) -> Option<String> {
        if self.credentials.has_valid_token() {
            self.credentials.get_access_token()
        } else {
            None
        }
    }

    async fn request_headers(&self, access_token: &str, requires_nonce: bool) -> Result<Headers> {
        let mut headers = Headers::new();
        headers.insert(AUTHORIZATION_HEADER.to_string(), bearer(access_token));
        if requires_nonce {
            let nonce = self.fetch_nonce(access_token).await?;
            headers.insert(NONCE_HEADER.to_string(), nonce);
        }
        Ok(headers)
    }

    /// Re-authenticate after the server rejected `rejected_token`.
    ///
    /// Returns the new access token, or `None` if refresh and bootstrap both failed.
    async fn reauthenticate(&self, rejected_token: &str) -> Option<String> {
        let seen = self.attempts.load(Ordering::Acquire);
        let guard = self.refresh_lock.lock().await;

        // Another caller may have already replaced the rejected token
        let current = self.valid_access_token();
        if let Some(current) = &current {
            if current != rejected_token {
                tracing::debug!(target: TRACING_TARGET, "Token already replaced by another caller");
                return Some(current.clone());
            }
        }
        if current.is_none() && self.attempts.load(Ordering::Acquire) != seen {
            tracing::debug!(target: TRACING_TARGET, "Concurrent re-authentication failed, not repeating it");
            return None;
        }

        if self.credentials.get_refresh_token().is_some() {
            match self.refresh(&guard).await {
                Ok(_) => {
                    if let Some(token) = self.valid_access_token() {
                        return Some(token);
                    }
                }
                Err(e) => {
                    tracing::info!(target: TRACING_TARGET, error = %e, "Refresh after 401 failed, starting new session");
                }
            }
        }

        match self.bootstrap(&guard).await {
            Ok(_) => self.valid_access_token(),
            Err(e) => {
                tracing::warn!(target: TRACING_TARGET, error = %e, "Re-authentication failed");
                None
            }
        }
    }

    // ─── Authenticated Requests ──────────────────────────────────────────────

    /// Send an authenticated request, recovering from expired tokens and stale nonces.
    ///
    /// `send` is called with the request headers (bearer token, plus nonce
    /// when `requires_nonce`) and may be called up to three times. At most one
    /// retry follows a 401 (after refresh or bootstrap) and at most one
    /// follows a 412 on a nonce-protected call.
    pub async fn execute_authenticated<T, F, Fut, P>(
        &self,
        send: F,
        parse: P,
        requires_nonce: bool,
    ) -> Result<T>
    where
        F: Fn(Headers) -> Fut,
        Fut: Future<Output = Response>,
        P: FnOnce(Value) -> std::result::Result<T, serde_json::Error>,
    {
        let ensured = self.ensure_authenticated().await;

        let mut access_token = match self.valid_access_token() {
            Some(token) => token,
            None => {
                let message = match ensured {
                    Err(e) => format!("Could not obtain an access token: {}", e.message),
                    Ok(()) => "Could not obtain an access token".to_string(),
                };
                return Err(ApiError::not_authenticated(message));
            }
        };

        let mut headers = self.request_headers(&access_token, requires_nonce).await?;
        let mut response = send(headers.clone()).await;

        if response.status == 401 {
            tracing::info!(target: TRACING_TARGET, "Request unauthorized, re-authenticating");
            if let Some(new_token) = self.reauthenticate(&access_token).await {
                access_token = new_token;
                headers = self.request_headers(&access_token, requires_nonce).await?;
                response = send(headers.clone()).await;
            }
        }

        if response.status == 412 && requires_nonce {
            tracing::info!(target: TRACING_TARGET, "Nonce rejected, retrying with a fresh nonce");
            let nonce = self.fetch_nonce(&access_token).await?;
            headers.insert(NONCE_HEADER.to_string(), nonce);
            response = send(headers).await;
        }

        if !response.is_success() {
            return Err(response.to_error());
        }

        let json = response
            .parse_json()
            .ok_or_else(|| ApiError::parse(response.status, "Response body was not a JSON object"))?;
        parse(json).map_err(|e| {
            ApiError::parse(response.status, format!("Unexpected response shape: {}", e))
        })
    }
}

fn parse_session(response: &Response) -> Result<Session> {
    let json = response
        .parse_json()
        .ok_or_else(|| ApiError::parse(response.status, "Session response was not a JSON object"))?;
    serde_json::from_value(json)
        .map_err(|e| ApiError::parse(response.status, format!("Invalid session response: {}", e)))
}
