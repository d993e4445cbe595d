// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request and response shapes shared by the coin-owning route groups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::models::{Coin, EntityProfit, SummaryRecord};
use crate::services::QuoteSource;
use crate::AppState;

/// Body for recording a coin mention.
#[derive(Debug, Deserialize, Validate)]
pub struct NewCoinRequest {
    #[validate(length(min = 1, max = 128))]
    pub token_address: String,
    /// Defaults to now
    #[serde(default)]
    pub share_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub share_price: Option<f64>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub share_market_cap: Option<f64>,
}

/// Look the token up and build the coin to store.
///
/// Unlike aggregation, a failed lookup here is the caller's error.
pub async fn record_coin(state: &AppState, request: NewCoinRequest) -> Result<Coin> {
    request.validate()?;
    let token_address = request.token_address.trim();
    if token_address.is_empty() {
        return Err(AppError::BadRequest("token_address is blank".to_string()));
    }

    let quote = tokio::time::timeout(
        state.config.quote_fetch_timeout,
        state.market_data.fetch_quote(token_address),
    )
    .await
    .map_err(|_| AppError::MarketData(format!("Timed out looking up {}", token_address)))??;

    tracing::info!(
        token_address,
        symbol = %quote.symbol,
        "Recording coin"
    );

    Ok(Coin::from_quote(
        token_address,
        &quote,
        request.share_date.unwrap_or_else(Utc::now),
        request.share_price,
        request.share_market_cap,
    ))
}

/// A favorite coin with its holder.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FavoriteCoin {
    #[serde(flatten)]
    pub coin: Coin,
    pub holder_id: String,
    pub holder_name: String,
    pub holder_social_handle: String,
}

/// Mean profit of a holder with at least one quotable coin.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AverageProfit {
    pub id: String,
    pub name: String,
    pub average_profit: f64,
    pub valid_coin_count: u32,
}

/// Per-holder averages from a summary, skipping holders with no data.
pub fn average_profits(summary: SummaryRecord) -> Vec<AverageProfit> {
    summary
        .entities
        .into_iter()
        .filter_map(|e| {
            Some(AverageProfit {
                average_profit: e.average_profit?,
                id: e.id,
                name: e.name,
                valid_coin_count: e.valid_coin_count,
            })
        })
        .collect()
}

/// Overall and per-influencer profit of one app user.
///
/// Unlike [`AverageProfit`], every influencer is listed, with or without data.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfitBreakdown {
    pub id: String,
    /// Mean over every quotable coin; `None` when there are none
    pub average_profit: Option<f64>,
    pub valid_coin_count: u32,
    pub total_coin_count: u32,
    pub influencers: Vec<EntityProfit>,
}

impl ProfitBreakdown {
    pub fn from_summary(id: impl Into<String>, summary: SummaryRecord) -> Self {
        Self {
            id: id.into(),
            average_profit: summary.average_profit_overall,
            valid_coin_count: summary.valid_coin_count,
            total_coin_count: summary.total_coin_count,
            influencers: summary.entities,
        }
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
