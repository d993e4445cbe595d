// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profit aggregation over coin holders.
//!
//! One aggregation call:
//! 1. Collects the distinct token addresses of every coin in scope
//! 2. Resolves each address once (fresh cache entry, else a provider fetch),
//!    with bounded concurrency and a per-fetch timeout
//! 3. Waits for every lookup to settle
//! 4. Reduces in enumeration order (holder order, then coin order)
//!
//! A failed lookup only makes that token's coins non-computable; it never
//! fails the aggregation. Failures are not cached, so the next call retries.

use futures_util::{stream, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::models::{
    Coin, CoinHolder, CoinWithQuote, EntityAverage, EntityCoinCount, EntityProfit, HighlightCoin,
    SummaryRecord,
};
use crate::services::market_data::{MarketDataClient, QuoteSource};
use crate::services::profit::compute_profit_percent;
use crate::services::quote_cache::{QuoteCache, QuoteCacheEntry};

/// Tuning for quote resolution.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Upper bound on one provider call; a timeout counts as a failure.
    pub fetch_timeout: Duration,
    /// Provider calls in flight per aggregation call.
    pub max_concurrent_fetches: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(5),
            max_concurrent_fetches: 16,
        }
    }
}

/// Quotes resolved during one aggregation call, keyed by token address.
///
/// Addresses whose lookup failed are simply absent.
#[derive(Debug, Default, Clone)]
pub struct QuoteBook {
    quotes: HashMap<String, QuoteCacheEntry>,
}

impl QuoteBook {
    pub fn get(&self, token_address: &str) -> Option<&QuoteCacheEntry> {
        self.quotes.get(token_address)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl FromIterator<(String, QuoteCacheEntry)> for QuoteBook {
    fn from_iter<T: IntoIterator<Item = (String, QuoteCacheEntry)>>(iter: T) -> Self {
        Self {
            quotes: iter.into_iter().collect(),
        }
    }
}

/// Cache-aware quote resolution plus reduction into summaries.
pub struct AggregationEngine<S = MarketDataClient> {
    source: S,
    cache: Arc<QuoteCache>,
    options: EngineOptions,
}

impl<S: QuoteSource> AggregationEngine<S> {
    pub fn new(source: S, cache: Arc<QuoteCache>, options: EngineOptions) -> Self {
        Self {
            source,
            cache,
            options,
        }
    }

    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve every distinct address once, concurrently.
    pub async fn resolve_quotes<'a, I>(&self, addresses: I) -> QuoteBook
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct = distinct_addresses(addresses);
        let requested = distinct.len();

        let resolved: Vec<(String, Option<QuoteCacheEntry>)> = stream::iter(distinct)
            .map(|address| async move {
                let entry = self.resolve_one(&address).await;
                (address, entry)
            })
            .buffer_unordered(self.options.max_concurrent_fetches.max(1))
            .collect()
            .await;

        let book: QuoteBook = resolved
            .into_iter()
            .filter_map(|(address, entry)| entry.map(|e| (address, e)))
            .collect();

        tracing::debug!(
            requested,
            resolved = book.len(),
            "Resolved token quotes"
        );
        book
    }

    /// Fresh cache entry, else a provider fetch written back on success.
    async fn resolve_one(&self, token_address: &str) -> Option<QuoteCacheEntry> {
        if token_address.is_empty() {
            return None;
        }

        if let Some(entry) = self.cache.get_fresh(token_address) {
            tracing::debug!(token_address, "Quote cache hit");
            return Some(entry);
        }

        let fetch = self.source.fetch_quote(token_address);
        match tokio::time::timeout(self.options.fetch_timeout, fetch).await {
            Ok(Ok(quote)) => {
                let entry = QuoteCacheEntry::from_quote(&quote, self.cache.now_ms());
                self.cache.put(token_address, entry.clone());
                Some(entry)
            }
            Ok(Err(e)) => {
                tracing::warn!(token_address, error = %e, "Quote unavailable");
                None
            }
            Err(_) => {
                tracing::warn!(
                    token_address,
                    timeout_ms = self.options.fetch_timeout.as_millis() as u64,
                    "Quote fetch timed out"
                );
                None
            }
        }
    }

    /// Highlights and averages over the given holders.
    pub async fn summarize<H: CoinHolder>(&self, holders: &[H]) -> SummaryRecord {
        let quotes = self.resolve_quotes(token_addresses(holders)).await;
        summarize_with(holders, &quotes)
    }

    /// All coins of the holders with current quotes, newest share first.
    pub async fn latest_with_quotes<H: CoinHolder>(&self, holders: &[H]) -> Vec<CoinWithQuote> {
        let quotes = self.resolve_quotes(token_addresses(holders)).await;
        latest_with(holders, &quotes)
    }
}

fn token_addresses<H: CoinHolder>(holders: &[H]) -> impl Iterator<Item = &str> {
    holders
        .iter()
        .flat_map(|h| h.coins().iter().map(|c| c.token_address.as_str()))
}

/// Distinct addresses in first-seen order.
fn distinct_addresses<'a, I>(addresses: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    addresses
        .into_iter()
        .filter(|a| seen.insert(*a))
        .map(str::to_string)
        .collect()
}

/// Market-cap profit of a coin given resolved quotes.
fn coin_profit(coin: &Coin, quotes: &QuoteBook) -> Option<f64> {
    let current = quotes.get(&coin.token_address)?.current_market_cap;
    compute_profit_percent(coin.share_market_cap, current)
}

/// Reduce holders and resolved quotes into a summary.
///
/// Ties on every statistic go to the first holder/coin in enumeration
/// order. Holders with no quotable coin take no part in the average
/// comparison.
pub fn summarize_with<H: CoinHolder>(holders: &[H], quotes: &QuoteBook) -> SummaryRecord {
    let mut highest: Option<(f64, &H, &Coin)> = None;
    let mut most_coins: Option<(usize, &H)> = None;
    let mut overall_sum = 0.0;
    let mut overall_count: u32 = 0;
    let mut total_coin_count: u32 = 0;
    let mut entities = Vec::with_capacity(holders.len());

    for holder in holders {
        let coins = holder.coins();
        total_coin_count += coins.len() as u32;

        if most_coins.map_or(true, |(count, _)| coins.len() > count) {
            most_coins = Some((coins.len(), holder));
        }

        let mut holder_sum = 0.0;
        let mut holder_valid: u32 = 0;

        for coin in coins {
            let Some(profit) = coin_profit(coin, quotes) else {
                continue;
            };

            holder_sum += profit;
            holder_valid += 1;
            overall_sum += profit;
            overall_count += 1;

            if highest.map_or(true, |(best, _, _)| profit > best) {
                highest = Some((profit, holder, coin));
            }
        }

        entities.push(EntityProfit {
            id: holder.holder_id().to_string(),
            name: holder.holder_name().to_string(),
            coin_count: coins.len() as u32,
            valid_coin_count: holder_valid,
            total_profit: holder_sum,
            average_profit: (holder_valid > 0).then(|| holder_sum / holder_valid as f64),
        });
    }

    let mut best_average: Option<(f64, &EntityProfit)> = None;
    for entity in &entities {
        let Some(average) = entity.average_profit else {
            continue;
        };
        if best_average.map_or(true, |(best, _)| average > best) {
            best_average = Some((average, entity));
        }
    }

    SummaryRecord {
        highest_profit_coin: highest.map(|(profit, holder, coin)| HighlightCoin {
            coin_id: coin.id.clone(),
            symbol: coin.symbol.clone(),
            name: coin.name.clone(),
            token_address: coin.token_address.clone(),
            profit_percent: profit,
            holder_id: holder.holder_id().to_string(),
            holder_name: holder.holder_name().to_string(),
        }),
        most_coins_entity: most_coins.map(|(count, holder)| EntityCoinCount {
            id: holder.holder_id().to_string(),
            name: holder.holder_name().to_string(),
            coin_count: count as u32,
        }),
        highest_average_profit_entity: best_average.map(|(average, entity)| EntityAverage {
            id: entity.id.clone(),
            name: entity.name.clone(),
            average_profit: average,
            valid_coin_count: entity.valid_coin_count,
        }),
        average_profit_overall: (overall_count > 0).then(|| overall_sum / overall_count as f64),
        valid_coin_count: overall_count,
        total_coin_count,
        entities,
    }
}

/// Join coins with their quotes, sorted by share date, newest first.
///
/// Coins without a quote keep their row with null quote fields.
pub fn latest_with<H: CoinHolder>(holders: &[H], quotes: &QuoteBook) -> Vec<CoinWithQuote> {
    let mut rows: Vec<CoinWithQuote> = holders
        .iter()
        .flat_map(|holder| {
            holder.coins().iter().map(move |coin| {
                let quote = quotes.get(&coin.token_address);
                let current_price = quote.and_then(|q| q.current_price);
                let current_market_cap = quote.and_then(|q| q.current_market_cap);

                CoinWithQuote {
                    coin: coin.clone(),
                    holder_id: holder.holder_id().to_string(),
                    holder_name: holder.holder_name().to_string(),
                    current_price,
                    current_market_cap,
                    url: quote.and_then(|q| q.source_url.clone()),
                    profit_percent: compute_profit_percent(
                        coin.share_market_cap,
                        current_market_cap,
                    ),
                    price_change_percent: compute_profit_percent(coin.share_price, current_price),
                }
            })
        })
        .collect();

    // Stable: equal dates keep enumeration order.
    rows.sort_by(|a, b| b.coin.share_date.cmp(&a.coin.share_date));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::coin::test_support::coin;
    use crate::models::Influencer;

    fn quote(market_cap: f64) -> QuoteCacheEntry {
        QuoteCacheEntry {
            current_price: Some(2.0),
            current_market_cap: Some(market_cap),
            source_url: Some("https://dexscreener.com/x".to_string()),
            fetched_at_epoch_ms: 0,
        }
    }

    fn influencer(name: &str, coins: Vec<Coin>) -> Influencer {
        let mut i = Influencer::new(name, &format!("@{}", name));
        i.coins = coins;
        i
    }

    fn book(entries: &[(&str, f64)]) -> QuoteBook {
        entries
            .iter()
            .map(|(addr, cap)| (addr.to_string(), quote(*cap)))
            .collect()
    }

    #[test]
    fn test_single_influencer_scenario() {
        let holders = vec![influencer(
            "alice",
            vec![coin("x", "X", Some(1000.0)), coin("y", "Y", Some(2000.0))],
        )];

        let summary = summarize_with(&holders, &book(&[("X", 1500.0), ("Y", 1000.0)]));

        assert_eq!(summary.average_profit_overall, Some(0.0));
        let best = summary.highest_profit_coin.unwrap();
        assert_eq!(best.coin_id, "x");
        assert_eq!(best.profit_percent, 50.0);
        assert_eq!(summary.valid_coin_count, 2);
        assert_eq!(summary.entities[0].total_profit, 0.0);
    }

    #[test]
    fn test_most_coins_first_max_wins() {
        let counts = [3, 5, 5, 1];
        let holders: Vec<Influencer> = counts
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let coins = (0..n)
                    .map(|j| coin(&format!("c{}-{}", i, j), "A", Some(1.0)))
                    .collect();
                influencer(&format!("inf{}", i), coins)
            })
            .collect();

        let summary = summarize_with(&holders, &QuoteBook::default());

        let most = summary.most_coins_entity.unwrap();
        assert_eq!(most.id, holders[1].id);
        assert_eq!(most.coin_count, 5);
    }

    #[test]
    fn test_highest_profit_tie_first_wins() {
        let holders = vec![
            influencer("first", vec![coin("a", "A", Some(100.0))]),
            influencer("second", vec![coin("b", "B", Some(100.0))]),
        ];

        let summary = summarize_with(&holders, &book(&[("A", 300.0), ("B", 300.0)]));

        assert_eq!(summary.highest_profit_coin.unwrap().coin_id, "a");
        assert_eq!(
            summary.highest_average_profit_entity.unwrap().id,
            holders[0].id
        );
    }

    #[test]
    fn test_average_excludes_holders_without_valid_coins() {
        let holders = vec![
            influencer(
                "prolific",
                vec![
                    coin("p1", "DEAD1", Some(100.0)),
                    coin("p2", "DEAD2", Some(100.0)),
                    coin("p3", "DEAD3", Some(100.0)),
                ],
            ),
            influencer("loser", vec![coin("l1", "L", Some(100.0))]),
        ];

        let summary = summarize_with(&holders, &book(&[("L", 10.0)]));

        assert_eq!(summary.most_coins_entity.unwrap().id, holders[0].id);
        let best = summary.highest_average_profit_entity.unwrap();
        assert_eq!(best.id, holders[1].id);
        assert_eq!(best.average_profit, -90.0);
        assert_eq!(summary.entities[0].average_profit, None);
    }

    #[test]
    fn test_no_valid_coins_is_no_data() {
        let holders = vec![influencer("a", vec![coin("a", "A", None)])];

        let summary = summarize_with(&holders, &book(&[("A", 100.0)]));

        assert_eq!(summary.average_profit_overall, None);
        assert!(summary.highest_profit_coin.is_none());
        assert!(summary.highest_average_profit_entity.is_none());
        assert_eq!(summary.valid_coin_count, 0);
        assert_eq!(summary.total_coin_count, 1);
    }

    #[test]
    fn test_most_coins_with_no_coins_is_first_holder() {
        let holders = vec![influencer("first", vec![]), influencer("second", vec![])];

        let summary = summarize_with(&holders, &QuoteBook::default());

        let most = summary.most_coins_entity.unwrap();
        assert_eq!(most.id, holders[0].id);
        assert_eq!(most.coin_count, 0);
        assert!(summary.highest_profit_coin.is_none());
        assert_eq!(summary.average_profit_overall, None);
    }

    #[test]
    fn test_empty_scope() {
        let summary = summarize_with::<Influencer>(&[], &QuoteBook::default());
        assert!(summary.most_coins_entity.is_none());
        assert!(summary.entities.is_empty());
    }

    #[test]
    fn test_latest_sorted_newest_first_with_null_quotes() {
        let mut old = coin("old", "A", Some(100.0));
        old.share_date = chrono::DateTime::from_timestamp(1_000, 0).unwrap();
        let mut new = coin("new", "MISSING", Some(100.0));
        new.share_date = chrono::DateTime::from_timestamp(2_000, 0).unwrap();
        let holders = vec![influencer("a", vec![old, new])];

        let rows = latest_with(&holders, &book(&[("A", 150.0)]));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].coin.id, "new");
        assert_eq!(rows[0].current_market_cap, None);
        assert_eq!(rows[0].profit_percent, None);
        assert_eq!(rows[1].coin.id, "old");
        assert_eq!(rows[1].profit_percent, Some(50.0));
        assert_eq!(rows[1].price_change_percent, Some(100.0));
    }

    #[test]
    fn test_distinct_addresses_keeps_first_seen_order() {
        let distinct = distinct_addresses(["B", "A", "B", "C", "A"]);
        assert_eq!(distinct, vec!["B", "A", "C"]);
    }
}
