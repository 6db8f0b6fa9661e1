// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Leaderboard model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A leaderboard configuration as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Server-assigned board ID
    pub id: String,
    /// Owning game ID
    #[serde(default)]
    pub game_id: String,
    /// Display name
    pub name: String,
    /// Human-readable lookup key, unique per game
    #[serde(default)]
    pub slug: String,
    /// Short shareable code
    #[serde(default)]
    pub short_code: Option<String>,
    /// Icon name or URL
    #[serde(default)]
    pub icon: Option<String>,
    /// Unit label for values (e.g. "seconds")
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// "ASCENDING" or "DESCENDING"
    #[serde(default)]
    pub sort_direction: Option<String>,
    /// Which submissions per player are retained (e.g. "BEST_ONLY")
    #[serde(default)]
    pub keep_strategy: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// Parameters for listing boards.
#[derive(Debug, Clone, Default)]
pub struct BoardQuery {
    /// Page size (clamped to 1..=100, default 25)
    pub limit: Option<u32>,
    /// Opaque cursor from a previous page
    pub cursor: Option<String>,
}
