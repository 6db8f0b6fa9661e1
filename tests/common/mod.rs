// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: a scripted in-memory transport and client builders.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use leadr_sdk::services::transport::{Headers, Response, Transport};
use leadr_sdk::storage::{CredentialStore, MemoryStore};
use leadr_sdk::{ClientConfig, LeadrClient};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const SESSIONS: &str = "/v1/client/sessions";
pub const REFRESH: &str = "/v1/client/sessions/refresh";
pub const NONCE: &str = "/v1/client/nonce";
pub const BOARDS: &str = "/v1/client/boards";
pub const BOARD_BY_SLUG: &str = "/v1/client/boards/";
pub const SCORES: &str = "/v1/client/scores";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// A request the fake transport received.
#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    /// Full path including query string
    pub path: String,
    pub headers: Headers,
    pub body: Option<Value>,
}

impl Call {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

#[derive(Default)]
struct Route {
    queue: VecDeque<Response>,
    fallback: Option<Response>,
}

/// Transport that answers from scripted responses and records every call.
///
/// Routes match on method and path without the query string. One-shot
/// responses are used first, in order, then the fallback. Unscripted routes
/// answer 404.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), Route>>,
    calls: Mutex<Vec<Call>>,
    latency: Option<std::time::Duration>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every response is delayed, so concurrent callers overlap.
    pub fn with_latency(latency: std::time::Duration) -> Arc<Self> {
        Arc::new(Self {
            latency: Some(latency),
            ..Self::default()
        })
    }

    /// Answer the next matching call with `response`.
    pub fn enqueue(&self, method: Method, path: &str, response: Response) {
        self.route(method, path, |route| route.queue.push_back(response));
    }

    /// Answer every matching call (after queued responses) with `response`.
    pub fn always(&self, method: Method, path: &str, response: Response) {
        self.route(method, path, |route| route.fallback = Some(response));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && route_key(&c.path) == path)
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls_to(method, path).len()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn route(&self, method: Method, path: &str, f: impl FnOnce(&mut Route)) {
        let mut routes = self.routes.lock().unwrap();
        f(routes.entry((method, path.to_string())).or_default());
    }

    async fn respond(
        &self,
        method: Method,
        path: &str,
        headers: &Headers,
        body: Option<&Value>,
    ) -> Response {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            headers: headers.clone(),
            body: body.cloned(),
        });

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut routes = self.routes.lock().unwrap();
        let scripted = routes
            .get_mut(&(method, route_key(path).to_string()))
            .and_then(|route| route.queue.pop_front().or_else(|| route.fallback.clone()));

        scripted.unwrap_or_else(|| Response::new(404, r#"{"error":"no scripted response"}"#))
    }
}

fn route_key(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn get(&self, path: &str, headers: &Headers) -> Response {
        self.respond(Method::Get, path, headers, None).await
    }

    async fn post(&self, path: &str, body: Option<&Value>, headers: &Headers) -> Response {
        self.respond(Method::Post, path, headers, body).await
    }
}

/// Token-bearing session body.
pub fn session_response(access: &str, refresh: &str, expires_in: i64) -> Response {
    Response::new(
        200,
        json!({
            "id": "dev_1",
            "game_id": "test-game",
            "account_id": "acc_1",
            "status": "ACTIVE",
            "expires_in": expires_in,
            "access_token": access,
            "refresh_token": refresh,
        })
        .to_string(),
    )
}

pub fn nonce_response(nonce: &str) -> Response {
    Response::new(200, json!({ "nonce_value": nonce }).to_string())
}

pub fn error_response(status: u16, message: &str) -> Response {
    Response::new(status, json!({ "error": message }).to_string())
}

pub fn board_json(id: &str, slug: &str) -> Value {
    json!({
        "id": id,
        "game_id": "test-game",
        "name": format!("Board {}", id),
        "slug": slug,
        "is_active": true,
        "sort_direction": "DESCENDING",
        "keep_strategy": "BEST_ONLY",
        "created_at": "2026-01-01T00:00:00Z"
    })
}

pub fn score_json(id: &str, board_id: &str, player: &str, value: f64) -> Value {
    json!({
        "id": id,
        "board_id": board_id,
        "game_id": "test-game",
        "player_name": player,
        "value": value,
        "created_at": "2026-01-01T00:00:00Z"
    })
}

pub fn page_response(items: Vec<Value>, pagination: Value) -> Response {
    Response::new(
        200,
        json!({ "data": items, "pagination": pagination }).to_string(),
    )
}

/// Client over `transport` with an isolated in-memory credential store.
pub fn test_client(transport: &Arc<FakeTransport>) -> (LeadrClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let client = LeadrClient::with_transport(
        ClientConfig::default(),
        transport.clone(),
        store.clone(),
    );
    (client, store)
}

/// Store a token pair expiring `expires_in_secs` from now.
pub fn seed_tokens(store: &Arc<MemoryStore>, access: &str, refresh: &str, expires_in_secs: i64) {
    CredentialStore::new(store.clone())
        .save_tokens(access, refresh, Utc::now() + Duration::seconds(expires_in_secs))
        .expect("memory store writes cannot fail");
}

/// A client that already holds a fresh session.
pub fn authenticated_client(transport: &Arc<FakeTransport>) -> (LeadrClient, Arc<MemoryStore>) {
    let (client, store) = test_client(transport);
    seed_tokens(&store, "access-1", "refresh-1", 3600);
    (client, store)
}
