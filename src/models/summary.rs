//! Aggregated profit summaries and quote-enriched coin listings.
//!
//! These are computed on request from live quotes and never stored.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Coin;

/// Highlights and averages over one aggregation scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SummaryRecord {
    // ─── Highlights ──────────────────────────────────────────────
    /// Coin with the highest profit (first encountered wins ties)
    pub highest_profit_coin: Option<HighlightCoin>,
    /// Holder with the most coins (first encountered wins ties)
    pub most_coins_entity: Option<EntityCoinCount>,
    /// Holder with the best mean profit over its quotable coins
    pub highest_average_profit_entity: Option<EntityAverage>,

    // ─── Totals ──────────────────────────────────────────────────
    /// Mean profit over all quotable coins; `None` when there are none
    pub average_profit_overall: Option<f64>,
    /// Coins whose profit could be computed
    pub valid_coin_count: u32,
    /// All coins in scope
    pub total_coin_count: u32,

    // ─── Breakdown ───────────────────────────────────────────────
    /// Per-holder figures in enumeration order
    pub entities: Vec<EntityProfit>,
}

/// The best-performing coin and its owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HighlightCoin {
    pub coin_id: String,
    pub symbol: String,
    pub name: String,
    pub token_address: String,
    pub profit_percent: f64,
    pub holder_id: String,
    pub holder_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EntityCoinCount {
    pub id: String,
    pub name: String,
    pub coin_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EntityAverage {
    pub id: String,
    pub name: String,
    pub average_profit: f64,
    pub valid_coin_count: u32,
}

/// Profit figures for a single holder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EntityProfit {
    pub id: String,
    pub name: String,
    pub coin_count: u32,
    pub valid_coin_count: u32,
    pub total_profit: f64,
    /// `None` when no coin of this holder could be quoted
    pub average_profit: Option<f64>,
}

/// A coin enriched with its current quote.
///
/// Quote fields are `null` when the provider could not be reached or does
/// not know the token; the row itself is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CoinWithQuote {
    #[serde(flatten)]
    pub coin: Coin,
    pub holder_id: String,
    pub holder_name: String,
    pub current_price: Option<f64>,
    pub current_market_cap: Option<f64>,
    pub url: Option<String>,
    /// Market-cap based profit since share time
    pub profit_percent: Option<f64>,
    /// Price based change since share time
    pub price_change_percent: Option<f64>,
}
