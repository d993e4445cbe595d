// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coin Tracker API Server
//!
//! Records coins shared by influencers and reports how they performed
//! against current DexScreener market data.

use coin_tracker::{config::Config, db::Db, services::accounts, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Coin Tracker API");

    // Firestore when a project is configured, otherwise in-memory
    let db = match &config.gcp_project_id {
        Some(project_id) => Db::firestore(project_id).await?,
        None => {
            tracing::warn!("GCP_PROJECT_ID not set, using in-memory store (data is not persisted)");
            Db::in_memory()
        }
    };

    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        let admin = accounts::ensure_admin(&db, username, password).await?;
        tracing::info!(admin_id = %admin.id, "Admin account ready");
    }

    tracing::info!(
        base_url = %config.market_data_base_url,
        ttl_ms = config.quote_cache_ttl_ms,
        capacity = config.quote_cache_capacity,
        "Quote cache initialized"
    );

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db));

    // Build router
    let app = coin_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("coin_tracker=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
