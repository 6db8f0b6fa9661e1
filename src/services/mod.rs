// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - transport, session and API operations.

pub mod leaderboard;
pub mod pagination;
pub mod session;
pub mod transport;

pub use leaderboard::LeadrClient;
pub use pagination::{ListEnvelope, Page, PageFetcher, PaginationMeta};
pub use session::{SessionManager, SessionState};
pub use transport::{Headers, HttpTransport, Response, Transport};
