// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models exchanged with the leaderboard service.

pub mod board;
pub mod score;
pub mod session;

pub use board::{Board, BoardQuery};
pub use score::{Score, ScoreQuery, SortDirection, SubmitScore};
pub use session::{NonceResponse, Session};
