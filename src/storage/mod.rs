// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local key/value persistence for device identity and session tokens.

pub mod credentials;
pub mod file;
pub mod memory;

pub use credentials::CredentialStore;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Key names as constants.
pub mod keys {
    pub const FINGERPRINT: &str = "leadr_device_fingerprint";
    pub const ACCESS_TOKEN: &str = "leadr_access_token";
    pub const REFRESH_TOKEN: &str = "leadr_refresh_token";
    /// RFC3339 instant at which the access token stops being accepted
    pub const EXPIRES_AT: &str = "leadr_token_expires_at";
}

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Host platform key/value storage.
///
/// Reads never fail; a missing or unreadable entry is `None`. Writes may
/// fail and the caller decides whether that is fatal.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
