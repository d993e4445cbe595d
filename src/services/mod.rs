// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod accounts;
pub mod aggregation;
pub mod highlights;
pub mod market_data;
pub mod password;
pub mod profit;
pub mod quote_cache;

pub use aggregation::{AggregationEngine, EngineOptions, QuoteBook};
pub use highlights::{HighlightService, Scope};
pub use market_data::{MarketDataClient, QuoteError, QuoteSource};
pub use quote_cache::{Clock, ManualClock, QuoteCache, QuoteCacheEntry, SystemClock};
