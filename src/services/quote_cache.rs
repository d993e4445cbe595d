// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory cache of token quotes.
//!
//! The cache stores raw entries with their fetch time; whether an entry is
//! still usable is decided by the caller via [`QuoteCacheEntry::is_fresh`].
//! Size is bounded: inserting a new key into a full cache first sweeps
//! stale entries, then evicts the oldest fetch.

use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::models::MarketQuote;

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        crate::time_utils::epoch_ms_now()
    }
}

/// Manually driven clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
        }
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Last fetched quote for a token address.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteCacheEntry {
    pub current_price: Option<f64>,
    pub current_market_cap: Option<f64>,
    pub source_url: Option<String>,
    pub fetched_at_epoch_ms: i64,
}

impl QuoteCacheEntry {
    pub fn from_quote(quote: &MarketQuote, fetched_at_epoch_ms: i64) -> Self {
        Self {
            current_price: quote.price_usd,
            current_market_cap: quote.market_cap,
            source_url: quote.url.clone(),
            fetched_at_epoch_ms,
        }
    }

    /// An entry is fresh while `now - fetched_at <= ttl`.
    pub fn is_fresh(&self, now_ms: i64, ttl_ms: i64) -> bool {
        now_ms - self.fetched_at_epoch_ms <= ttl_ms
    }
}

/// Bounded, clock-driven quote cache keyed by token address.
pub struct QuoteCache {
    entries: DashMap<String, QuoteCacheEntry>,
    ttl_ms: i64,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl QuoteCache {
    pub fn new(ttl_ms: i64, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_ms,
            capacity: capacity.max(1),
            clock,
        }
    }

    /// Cache using the wall clock.
    pub fn with_system_clock(ttl_ms: i64, capacity: usize) -> Self {
        Self::new(ttl_ms, capacity, Arc::new(SystemClock))
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Raw entry for an address, regardless of age.
    pub fn get(&self, token_address: &str) -> Option<QuoteCacheEntry> {
        self.entries.get(token_address).map(|e| e.value().clone())
    }

    /// Entry for an address only if it is still within the TTL.
    pub fn get_fresh(&self, token_address: &str) -> Option<QuoteCacheEntry> {
        let now = self.now_ms();
        self.get(token_address)
            .filter(|entry| entry.is_fresh(now, self.ttl_ms))
    }

    /// Store an entry, replacing any previous one for the address.
    pub fn put(&self, token_address: &str, entry: QuoteCacheEntry) {
        if !self.entries.contains_key(token_address) && self.entries.len() >= self.capacity {
            self.make_room();
        }
        self.entries.insert(token_address.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop stale entries; if still full, drop the oldest fetch.
    fn make_room(&self) {
        let now = self.now_ms();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.is_fresh(now, self.ttl_ms));
        let swept = before - self.entries.len();

        if self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|e| e.value().fetched_at_epoch_ms)
                .map(|e| e.key().clone());
            if let Some(key) = oldest {
                self.entries.remove(&key);
                tracing::debug!(token_address = %key, "Evicted oldest quote from full cache");
            }
        }

        if swept > 0 {
            tracing::debug!(swept, "Swept stale quotes from cache");
        }
    }
}
