// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cursor-based pages with bidirectional navigation.

use crate::error::{ApiError, Result};
use futures_util::future::BoxFuture;
use serde::Deserialize;
use std::sync::Arc;

/// Repeats the query that produced a page, with a different cursor.
pub type PageFetcher<T> = Arc<dyn Fn(String) -> BoxFuture<'static, Result<Page<T>>> + Send + Sync>;

/// Pagination block of a list response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationMeta {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub prev_cursor: Option<String>,
}

/// `{data: [...], pagination: {...}}` list response.
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: PaginationMeta,
}

/// One page of results plus the ability to fetch its neighbours.
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total count reported by the server
    pub count: u64,
    pub has_next: bool,
    pub has_prev: bool,
    pub next_cursor: Option<String>,
    pub prev_cursor: Option<String>,
    fetcher: Option<PageFetcher<T>>,
}

impl<T> Page<T> {
    /// Build a page from a decoded list envelope. Empty cursors are treated as absent.
    pub fn from_envelope(envelope: ListEnvelope<T>, fetcher: Option<PageFetcher<T>>) -> Self {
        let ListEnvelope { data, pagination } = envelope;
        Self {
            items: data,
            count: pagination.count,
            has_next: pagination.has_next,
            has_prev: pagination.has_prev,
            next_cursor: pagination.next_cursor.filter(|c| !c.is_empty()),
            prev_cursor: pagination.prev_cursor.filter(|c| !c.is_empty()),
            fetcher,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Fetch the following page. Fails locally if there is none.
    pub async fn next_page(&self) -> Result<Page<T>> {
        let cursor = match (&self.next_cursor, self.has_next) {
            (Some(cursor), true) => cursor.clone(),
            _ => return Err(ApiError::no_next_page()),
        };
        self.fetch(cursor).await
    }

    /// Fetch the preceding page. Fails locally if there is none.
    pub async fn prev_page(&self) -> Result<Page<T>> {
        let cursor = match (&self.prev_cursor, self.has_prev) {
            (Some(cursor), true) => cursor.clone(),
            _ => return Err(ApiError::no_prev_page()),
        };
        self.fetch(cursor).await
    }

    async fn fetch(&self, cursor: String) -> Result<Page<T>> {
        let fetcher = self.fetcher.as_ref().ok_or_else(ApiError::fetch_unavailable)?;
        fetcher(cursor).await
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: Clone> Clone for Page<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            count: self.count,
            has_next: self.has_next,
            has_prev: self.has_prev,
            next_cursor: self.next_cursor.clone(),
            prev_cursor: self.prev_cursor.clone(),
            fetcher: self.fetcher.clone(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Page<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("items", &self.items)
            .field("count", &self.count)
            .field("has_next", &self.has_next)
            .field("has_prev", &self.has_prev)
            .field("next_cursor", &self.next_cursor)
            .field("prev_cursor", &self.prev_cursor)
            .field("can_fetch", &self.fetcher.is_some())
            .finish()
    }
}
