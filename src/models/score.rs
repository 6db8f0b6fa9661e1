// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Score model and score request parameters.

use crate::error::{ApiError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single ranked entry on a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Server-assigned score ID
    pub id: String,
    pub board_id: String,
    #[serde(default)]
    pub game_id: String,
    pub player_name: String,
    pub value: f64,
    /// Preformatted value (e.g. "1:23.456")
    #[serde(default)]
    pub value_display: Option<String>,
    /// Arbitrary JSON object attached at submission
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// 1-based position on the board, when the server computed it
    #[serde(default)]
    pub rank: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Sort order for score listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

/// Parameters for listing scores on a board.
#[derive(Debug, Clone, Default)]
pub struct ScoreQuery {
    pub board_id: String,
    /// Page size (clamped to 1..=100, default 25)
    pub limit: Option<u32>,
    pub sort: Option<SortDirection>,
    /// Opaque cursor from a previous page
    pub cursor: Option<String>,
    /// Center the page around this score ID
    pub around_score_id: Option<String>,
    /// Center the page around this value
    pub around_score_value: Option<f64>,
}

impl ScoreQuery {
    pub fn for_board(board_id: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            ..Self::default()
        }
    }

    /// Local checks performed before any request is sent.
    pub fn validate(&self) -> Result<()> {
        if self.board_id.trim().is_empty() {
            return Err(ApiError::invalid_argument("board_id is required"));
        }

        let around_id = self
            .around_score_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty());
        let around_value = self.around_score_value.is_some();

        if around_id && around_value {
            return Err(ApiError::invalid_argument(
                "around_score_id and around_score_value are mutually exclusive",
            ));
        }

        if let Some(value) = self.around_score_value {
            if !value.is_finite() {
                return Err(ApiError::invalid_argument(
                    "around_score_value must be a finite number",
                ));
            }
        }

        let has_cursor = self.cursor.as_deref().is_some_and(|c| !c.is_empty());
        if has_cursor && (around_id || around_value) {
            return Err(ApiError::invalid_argument(
                "around_score_id/around_score_value cannot be combined with a cursor",
            ));
        }

        Ok(())
    }
}

/// Score submission payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubmitScore {
    pub board_id: String,
    pub value: f64,
    pub player_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl SubmitScore {
    pub fn new(board_id: impl Into<String>, value: f64, player_name: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            value,
            player_name: player_name.into(),
            ..Self::default()
        }
    }

    /// Local checks performed before any request is sent.
    pub fn validate(&self) -> Result<()> {
        if self.board_id.trim().is_empty() {
            return Err(ApiError::invalid_argument("board_id is required"));
        }
        if self.player_name.trim().is_empty() {
            return Err(ApiError::invalid_argument("player_name is required"));
        }
        if !self.value.is_finite() {
            return Err(ApiError::invalid_argument("value must be a finite number"));
        }
        if let Some(display) = &self.value_display {
            if display.trim().is_empty() {
                return Err(ApiError::invalid_argument(
                    "value_display must not be blank when provided",
                ));
            }
        }
        if let Some(metadata) = &self.metadata {
            if !metadata.is_object() {
                return Err(ApiError::invalid_argument("metadata must be a JSON object"));
            }
        }
        Ok(())
    }
}
