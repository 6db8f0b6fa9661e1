// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Device fingerprint and session token persistence.
//!
//! Only the session manager writes tokens; hosts get read access through it.

use super::{keys, KeyValueStore, StoreError};
use crate::time_utils::{format_utc_rfc3339, parse_utc_rfc3339};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Typed view over the four credential entries of a [`KeyValueStore`].
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("has_access_token", &self.get_access_token().is_some())
            .field("expires_at", &self.get_expires_at())
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Return the installation fingerprint, generating and persisting one on first use.
    pub fn get_or_create_fingerprint(&self) -> Result<String, StoreError> {
        if let Some(existing) = self.non_empty(keys::FINGERPRINT) {
            return Ok(existing);
        }

        let fingerprint = uuid::Uuid::new_v4().simple().to_string();
        self.store.set(keys::FINGERPRINT, &fingerprint)?;
        tracing::info!("Generated new device fingerprint");
        Ok(fingerprint)
    }

    /// Persist a token pair. Access token and expiry are always written together.
    pub fn save_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.store.set(keys::ACCESS_TOKEN, access_token)?;
        self.store
            .set(keys::EXPIRES_AT, &format_utc_rfc3339(expires_at))?;
        self.store.set(keys::REFRESH_TOKEN, refresh_token)?;
        Ok(())
    }

    pub fn get_access_token(&self) -> Option<String> {
        self.non_empty(keys::ACCESS_TOKEN)
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.non_empty(keys::REFRESH_TOKEN)
    }

    /// Stored expiry; an unparseable value counts as unknown.
    pub fn get_expires_at(&self) -> Option<DateTime<Utc>> {
        self.non_empty(keys::EXPIRES_AT)
            .and_then(|v| parse_utc_rfc3339(&v))
    }

    /// Access token present and not yet expired.
    pub fn has_valid_token(&self) -> bool {
        self.has_valid_token_at(Utc::now())
    }

    pub fn has_valid_token_at(&self, now: DateTime<Utc>) -> bool {
        if self.get_access_token().is_none() {
            return false;
        }
        matches!(self.get_expires_at(), Some(expires_at) if now < expires_at)
    }

    /// True if no expiry is known or `now + threshold` reaches it.
    pub fn is_token_expiring_soon(&self, threshold: Duration) -> bool {
        self.is_token_expiring_soon_at(threshold, Utc::now())
    }

    pub fn is_token_expiring_soon_at(&self, threshold: Duration, now: DateTime<Utc>) -> bool {
        match self.get_expires_at() {
            Some(expires_at) => now + threshold >= expires_at,
            None => true,
        }
    }

    /// Remove the token pair and expiry. The fingerprint is kept.
    pub fn clear_tokens(&self) -> Result<(), StoreError> {
        self.store.remove(keys::ACCESS_TOKEN)?;
        self.store.remove(keys::REFRESH_TOKEN)?;
        self.store.remove(keys::EXPIRES_AT)?;
        Ok(())
    }

    pub fn clear_all(&self) -> Result<(), StoreError> {
        self.clear_tokens()?;
        self.store.remove(keys::FINGERPRINT)?;
        Ok(())
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        self.store.get(key).filter(|v| !v.is_empty())
    }
}
