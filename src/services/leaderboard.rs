// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public leaderboard operations.
//!
//! Every operation validates its input locally, then delegates to
//! [`SessionManager::execute_authenticated`] so it inherits token refresh
//! and nonce recovery. List operations return a [`Page`] that can fetch its
//! neighbours with the same query.

use crate::config::{ClientConfig, ConfigError};
use crate::error::{ApiError, Result};
use crate::models::{Board, BoardQuery, Score, ScoreQuery, Session, SubmitScore};
use crate::services::pagination::{ListEnvelope, Page, PageFetcher};
use crate::services::session::{SessionManager, SessionState};
use crate::services::transport::{HttpTransport, Transport};
use crate::storage::{CredentialStore, KeyValueStore};
use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Tracing target for client operations.
pub const TRACING_TARGET: &str = "leadr_sdk::client";

/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_LIMIT: u32 = 25;
/// Largest page size the service accepts.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Leaderboard endpoints.
pub mod endpoints {
    pub const BOARDS: &str = "/v1/client/boards";
    /// Slug lookup goes through the list endpoint (trailing slash included)
    pub const BOARD_BY_SLUG: &str = "/v1/client/boards/";
    pub const SCORES: &str = "/v1/client/scores";
}

struct ClientInner {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    session: SessionManager,
}

/// Leaderboard API client.
///
/// Construct one per process at the application's composition root and clone
/// it freely; clones share the same session.
///
/// ```rust,ignore
/// let store = Arc::new(FileStore::open("leadr_credentials.json")?);
/// let client = LeadrClient::new(ClientConfig::from_env()?, store)?;
///
/// let page = client.list_boards(BoardQuery::default()).await?;
/// if page.has_next {
///     let next = page.next_page().await?;
/// }
/// ```
#[derive(Clone)]
pub struct LeadrClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for LeadrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadrClient")
            .field("config", &self.inner.config)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl LeadrClient {
    /// Create a client that talks HTTP to the configured service.
    pub fn new(config: ClientConfig, store: Arc<dyn KeyValueStore>) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;

        tracing::info!(
            target: TRACING_TARGET,
            base_url = %config.base_url,
            game_id = %config.game_id,
            "Leaderboard client created"
        );

        Ok(Self::with_transport(config, Arc::new(transport), store))
    }

    /// Create a client over any transport (used for fakes in tests).
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let session = SessionManager::new(
            transport.clone(),
            CredentialStore::new(store),
            config.game_id.clone(),
        );

        Self {
            inner: Arc::new(ClientInner {
                config,
                transport,
                session,
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    pub fn session_state(&self) -> SessionState {
        self.inner.session.state()
    }

    /// Bootstrap a new session explicitly (normally done lazily).
    pub async fn start_session(&self) -> Result<Session> {
        self.inner.session.start_session().await
    }

    /// Drop the stored tokens; the next call starts a new session.
    pub async fn sign_out(&self) -> Result<()> {
        self.inner.session.clear_session().await
    }

    // ─── Boards ──────────────────────────────────────────────────────────────

    /// List the game's boards.
    pub async fn list_boards(&self, query: BoardQuery) -> Result<Page<Board>> {
        let request = ListRequest::new(
            endpoints::BOARDS,
            vec![
                ("game_id", self.inner.config.game_id.clone()),
                ("limit", clamp_limit(query.limit).to_string()),
            ],
        );
        fetch_page(self.inner.clone(), request, non_empty(query.cursor)).await
    }

    /// Look up a board by slug. An empty result is `not_found`.
    pub async fn get_board(&self, slug: &str) -> Result<Board> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(ApiError::invalid_argument("slug is required"));
        }

        let request = ListRequest::new(
            endpoints::BOARD_BY_SLUG,
            vec![
                ("slug", slug.to_string()),
                ("game_id", self.inner.config.game_id.clone()),
            ],
        );
        let path = request.path(None);
        let envelope: ListEnvelope<Board> = get_json(&self.inner, &path).await?;

        envelope.data.into_iter().next().ok_or_else(|| {
            tracing::debug!(target: TRACING_TARGET, slug, "Board lookup returned no items");
            ApiError::not_found(format!("Board '{}' not found", slug))
        })
    }

    // ─── Scores ──────────────────────────────────────────────────────────────

    /// List scores on a board, optionally centered around a score ID or value.
    pub async fn list_scores(&self, query: ScoreQuery) -> Result<Page<Score>> {
        query.validate()?;

        let mut params = vec![
            ("board_id", query.board_id.trim().to_string()),
            ("limit", clamp_limit(query.limit).to_string()),
        ];
        if let Some(sort) = query.sort {
            params.push(("sort", sort.as_str().to_string()));
        }

        let mut request = ListRequest::new(endpoints::SCORES, params);
        if let Some(id) = query.around_score_id.as_deref().filter(|id| !id.trim().is_empty()) {
            request.anchor.push(("around_score_id", id.trim().to_string()));
        }
        if let Some(value) = query.around_score_value {
            request.anchor.push(("around_score_value", value.to_string()));
        }

        fetch_page(self.inner.clone(), request, non_empty(query.cursor)).await
    }

    /// Get a single score by ID.
    pub async fn get_score(&self, score_id: &str) -> Result<Score> {
        let score_id = score_id.trim();
        if score_id.is_empty() {
            return Err(ApiError::invalid_argument("score_id is required"));
        }

        let path = format!("{}/{}", endpoints::SCORES, urlencoding::encode(score_id));
        get_json(&self.inner, &path).await
    }

    /// Submit a score. Protected by a one-time nonce.
    pub async fn submit_score(&self, submission: SubmitScore) -> Result<Score> {
        submission.validate()?;

        let body = serde_json::to_value(&submission)
            .map_err(|e| ApiError::invalid_argument(format!("Unserializable score: {}", e)))?;

        let transport = &self.inner.transport;
        let body = &body;
        let score: Score = self
            .inner
            .session
            .execute_authenticated(
                move |headers| async move {
                    transport.post(endpoints::SCORES, Some(body), &headers).await
                },
                serde_json::from_value,
                true,
            )
            .await?;

        tracing::info!(
            target: TRACING_TARGET,
            score_id = %score.id,
            board_id = %score.board_id,
            "Score submitted"
        );
        Ok(score)
    }
}

/// Query that can be repeated with a different cursor.
#[derive(Debug, Clone)]
struct ListRequest {
    endpoint: &'static str,
    /// Filters kept on every page
    params: Vec<(&'static str, String)>,
    /// Positioning parameters, replaced by the cursor on later pages
    anchor: Vec<(&'static str, String)>,
}

impl ListRequest {
    fn new(endpoint: &'static str, params: Vec<(&'static str, String)>) -> Self {
        Self {
            endpoint,
            params,
            anchor: Vec::new(),
        }
    }

    fn path(&self, cursor: Option<&str>) -> String {
        let mut pairs: Vec<String> = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();

        match cursor {
            Some(cursor) => pairs.push(format!("cursor={}", urlencoding::encode(cursor))),
            None => pairs.extend(
                self.anchor
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v))),
            ),
        }

        if pairs.is_empty() {
            self.endpoint.to_string()
        } else {
            format!("{}?{}", self.endpoint, pairs.join("&"))
        }
    }
}

fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
}

fn non_empty(cursor: Option<String>) -> Option<String> {
    cursor.filter(|c| !c.is_empty())
}

/// Authenticated GET decoding the body as `T`.
async fn get_json<T: DeserializeOwned>(inner: &ClientInner, path: &str) -> Result<T> {
    let transport = &inner.transport;
    inner
        .session
        .execute_authenticated(
            move |headers| async move { transport.get(path, &headers).await },
            serde_json::from_value,
            false,
        )
        .await
}

/// Fetch one page and bind a fetcher that repeats `request` with another cursor.
fn fetch_page<T>(
    inner: Arc<ClientInner>,
    request: ListRequest,
    cursor: Option<String>,
) -> BoxFuture<'static, Result<Page<T>>>
where
    T: DeserializeOwned + Send + 'static,
{
    Box::pin(async move {
        let path = request.path(cursor.as_deref());
        let envelope: ListEnvelope<T> = get_json(&inner, &path).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = request.endpoint,
            items = envelope.data.len(),
            has_next = envelope.pagination.has_next,
            "Fetched page"
        );

        let fetcher: PageFetcher<T> = Arc::new(move |cursor: String| {
            fetch_page(inner.clone(), request.clone(), Some(cursor))
        });
        Ok(Page::from_envelope(envelope, Some(fetcher)))
    })
}
