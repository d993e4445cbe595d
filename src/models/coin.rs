// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tracked coin mentions and the holders that own them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::ids::generate_id;
use crate::models::MarketQuote;

/// A coin shared by an influencer or user at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Coin {
    /// Generated document-local ID
    pub id: String,
    pub symbol: String,
    pub name: String,
    /// Contract address, used as the market-data lookup key
    pub token_address: String,
    /// When the coin was shared
    pub share_date: DateTime<Utc>,
    /// Price (USD) at share time
    #[serde(default)]
    pub share_price: Option<f64>,
    /// Market cap at share time, the baseline for profit
    #[serde(default)]
    pub share_market_cap: Option<f64>,
    #[serde(default)]
    pub is_favorite: bool,
}

/// Partial update of a coin's share fields.
///
/// Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, validator::Validate)]
pub struct CoinUpdate {
    pub share_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0))]
    pub share_price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub share_market_cap: Option<f64>,
}

impl Coin {
    /// Record a new mention; symbol and name come from the provider.
    pub fn from_quote(
        token_address: &str,
        quote: &MarketQuote,
        share_date: DateTime<Utc>,
        share_price: Option<f64>,
        share_market_cap: Option<f64>,
    ) -> Self {
        Self {
            id: generate_id(),
            symbol: quote.symbol.clone(),
            name: quote.name.clone(),
            token_address: token_address.to_string(),
            share_date,
            share_price,
            share_market_cap,
            is_favorite: false,
        }
    }

    /// Apply a partial update.
    pub fn apply_update(&mut self, update: &CoinUpdate) {
        if let Some(date) = update.share_date {
            self.share_date = date;
        }
        if let Some(price) = update.share_price {
            self.share_price = Some(price);
        }
        if let Some(cap) = update.share_market_cap {
            self.share_market_cap = Some(cap);
        }
    }
}

/// Anything that owns an ordered list of coins.
///
/// Flat users and nested influencers are walked through this trait, so
/// aggregation and coin editing share one code path.
pub trait CoinHolder {
    fn holder_id(&self) -> &str;
    fn holder_name(&self) -> &str;
    fn coins(&self) -> &[Coin];
    fn coins_mut(&mut self) -> &mut Vec<Coin>;

    fn coin_mut(&mut self, coin_id: &str) -> Option<&mut Coin> {
        self.coins_mut().iter_mut().find(|c| c.id == coin_id)
    }

    /// Remove a coin by ID, returning it if it existed.
    fn remove_coin(&mut self, coin_id: &str) -> Option<Coin> {
        let coins = self.coins_mut();
        let index = coins.iter().position(|c| c.id == coin_id)?;
        Some(coins.remove(index))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn coin(id: &str, token_address: &str, share_market_cap: Option<f64>) -> Coin {
        Coin {
            id: id.to_string(),
            symbol: id.to_uppercase(),
            name: format!("{} token", id),
            token_address: token_address.to_string(),
            share_date: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            share_price: Some(1.0),
            share_market_cap,
            is_favorite: false,
        }
    }
}
