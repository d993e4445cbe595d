// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coin Tracker: follow coins shared by influencers and how they performed
//!
//! This crate provides the backend API for recording coin mentions and
//! summarizing their profit against live DexScreener quotes.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use db::Db;
use services::{AggregationEngine, EngineOptions, HighlightService, MarketDataClient, QuoteCache};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    /// Used directly when recording coins
    pub market_data: MarketDataClient,
    pub highlights: HighlightService,
}

impl AppState {
    /// Wire the market data client, quote cache and engine from config.
    pub fn new(config: Config, db: Db) -> Self {
        let market_data = MarketDataClient::new(&config.market_data_base_url);
        let cache = Arc::new(QuoteCache::with_system_clock(
            config.quote_cache_ttl_ms,
            config.quote_cache_capacity,
        ));
        let engine = AggregationEngine::new(
            market_data.clone(),
            cache,
            EngineOptions {
                fetch_timeout: config.quote_fetch_timeout,
                max_concurrent_fetches: config.max_concurrent_quote_fetches,
            },
        );
        let highlights = HighlightService::new(db.clone(), Arc::new(engine));

        Self {
            config,
            db,
            market_data,
            highlights,
        }
    }
}
