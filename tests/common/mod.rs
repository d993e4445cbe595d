// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use coin_tracker::config::Config;
use coin_tracker::db::Db;
use coin_tracker::middleware::auth::create_jwt;
use coin_tracker::models::{AppUser, MarketQuote};
use coin_tracker::routes::create_router;
use coin_tracker::services::{accounts, QuoteError, QuoteSource};
use coin_tracker::AppState;
use dashmap::DashMap;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Connect to the Firestore emulator.
#[allow(dead_code)]
pub async fn test_db() -> Db {
    Db::firestore("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

// ─── Stub DexScreener ────────────────────────────────────────

#[derive(Default)]
struct StubState {
    pairs: DashMap<String, Value>,
    failing: DashMap<String, u16>,
    hits: DashMap<String, usize>,
}

/// DexScreener stand-in served by axum on an ephemeral port.
#[allow(dead_code)]
pub struct StubDex {
    pub base_url: String,
    state: Arc<StubState>,
}

#[allow(dead_code)]
impl StubDex {
    pub async fn spawn() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new()
            .route("/tokens/{address}", get(stub_tokens))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Serve one pair for the address.
    pub fn set_token(&self, address: &str, symbol: &str, market_cap: f64, price_usd: &str) {
        self.state.failing.remove(address);
        self.state.pairs.insert(
            address.to_string(),
            json!({
                "baseToken": {"symbol": symbol, "name": format!("{} Token", symbol)},
                "priceUsd": price_usd,
                "marketCap": market_cap,
                "url": format!("https://dexscreener.com/solana/{}", address),
            }),
        );
    }

    /// Answer the address with an HTTP error.
    pub fn fail_token(&self, address: &str, status: u16) {
        self.state.failing.insert(address.to_string(), status);
    }

    pub fn hits(&self, address: &str) -> usize {
        self.state.hits.get(address).map(|h| *h).unwrap_or(0)
    }
}

async fn stub_tokens(State(state): State<Arc<StubState>>, Path(address): Path<String>) -> Response {
    *state.hits.entry(address.clone()).or_insert(0) += 1;

    if let Some(status) = state.failing.get(&address) {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, "stub failure").into_response();
    }

    match state.pairs.get(&address) {
        Some(pair) => Json(json!({ "pairs": [pair.value().clone()] })).into_response(),
        None => Json(json!({ "pairs": null })).into_response(),
    }
}

// ─── Fake quote source for engine tests ──────────────────────

/// Scripted quote source with per-address delays and call counting.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeSource {
    quotes: DashMap<String, Result<MarketQuote, QuoteError>>,
    delays: DashMap<String, Duration>,
    calls: DashMap<String, usize>,
    total_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_market_cap(self, address: &str, market_cap: f64) -> Self {
        self.set_market_cap(address, market_cap);
        self
    }

    pub fn with_failure(self, address: &str) -> Self {
        self.set_failure(address);
        self
    }

    pub fn with_delay(self, address: &str, delay: Duration) -> Self {
        self.delays.insert(address.to_string(), delay);
        self
    }

    pub fn set_market_cap(&self, address: &str, market_cap: f64) {
        self.quotes.insert(
            address.to_string(),
            Ok(MarketQuote {
                symbol: address.to_uppercase(),
                name: format!("{} Token", address),
                price_usd: Some(market_cap / 1_000.0),
                market_cap: Some(market_cap),
                url: Some(format!("https://dexscreener.com/x/{}", address)),
            }),
        );
    }

    pub fn set_failure(&self, address: &str) {
        self.quotes.insert(
            address.to_string(),
            Err(QuoteError::Transport("connection reset".to_string())),
        );
    }

    pub fn calls(&self, address: &str) -> usize {
        self.calls.get(address).map(|c| *c).unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }
}

impl QuoteSource for FakeSource {
    async fn fetch_quote(&self, token_address: &str) -> Result<MarketQuote, QuoteError> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        *self.calls.entry(token_address.to_string()).or_insert(0) += 1;

        let delay = self.delays.get(token_address).map(|d| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let result = self.quotes.get(token_address).map(|q| q.value().clone());
        result.unwrap_or_else(|| Err(QuoteError::NotFound(token_address.to_string())))
    }
}

// ─── App ─────────────────────────────────────────────────────

/// Create a test app with an in-memory store and the stub market data.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(stub: &StubDex) -> (Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.market_data_base_url = stub.base_url.clone();

    let state = Arc::new(AppState::new(config, Db::in_memory()));
    (create_router(state.clone()), state)
}

/// Create a test app whose market data is unreachable.
#[allow(dead_code)]
pub fn create_offline_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), Db::in_memory()));
    (create_router(state.clone()), state)
}

/// Sign up an account (admin if requested) and mint a session token for it.
#[allow(dead_code)]
pub async fn seed_account(state: &AppState, username: &str, admin: bool) -> (AppUser, String) {
    let app_user = if admin {
        accounts::ensure_admin(&state.db, username, "admin-pass")
            .await
            .expect("create admin")
    } else {
        accounts::signup(&state.db, username, "user-pass")
            .await
            .expect("sign up")
    };

    let token = create_jwt(&app_user, &state.config.jwt_secret, 3600).expect("mint token");
    (app_user, token)
}

/// Send a request through the router and decode the JSON reply.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
