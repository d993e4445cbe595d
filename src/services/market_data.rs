// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! DexScreener client for current token prices and market caps.
//!
//! The provider may list several trading pairs for one token; the first pair
//! in the response is taken as canonical with no further ranking.

use serde::Deserialize;
use serde_json::Value;
use std::future::Future;

use crate::config::DEFAULT_MARKET_DATA_BASE_URL;
use crate::models::MarketQuote;

/// Errors from a single quote lookup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuoteError {
    /// The provider returned no pairs for the address.
    #[error("No trading pairs found for token {0}")]
    NotFound(String),

    /// Network, HTTP status, or decoding failure.
    #[error("Market data request failed: {0}")]
    Transport(String),
}

/// Something that can quote a token address.
pub trait QuoteSource: Send + Sync {
    fn fetch_quote(
        &self,
        token_address: &str,
    ) -> impl Future<Output = Result<MarketQuote, QuoteError>> + Send;
}

/// DexScreener API client.
#[derive(Clone)]
pub struct MarketDataClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for MarketDataClient {
    fn default() -> Self {
        Self::new(DEFAULT_MARKET_DATA_BASE_URL)
    }
}

impl MarketDataClient {
    /// Create a client against the given API base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl QuoteSource for MarketDataClient {
    async fn fetch_quote(&self, token_address: &str) -> Result<MarketQuote, QuoteError> {
        let url = format!(
            "{}/tokens/{}",
            self.base_url,
            urlencoding::encode(token_address)
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 429 {
                tracing::warn!(token_address, "DexScreener rate limit hit (429)");
            }
            let body = response.text().await.unwrap_or_default();
            return Err(QuoteError::Transport(format!("HTTP {}: {}", status, body)));
        }

        let body: TokensResponse = response
            .json()
            .await
            .map_err(|e| QuoteError::Transport(format!("JSON parse error: {}", e)))?;

        first_pair_quote(body, token_address)
    }
}

/// Response of `GET /tokens/{address}`.
#[derive(Debug, Deserialize)]
pub struct TokensResponse {
    #[serde(default)]
    pub pairs: Option<Vec<Pair>>,
}

/// One trading pair.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    pub base_token: BaseToken,
    /// Usually a decimal string ("0.0123"), occasionally a number
    #[serde(default)]
    pub price_usd: Option<Value>,
    #[serde(default)]
    pub market_cap: Option<Value>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BaseToken {
    pub symbol: String,
    pub name: String,
}

/// Pick the first pair of a response as the token's quote.
pub fn first_pair_quote(
    response: TokensResponse,
    token_address: &str,
) -> Result<MarketQuote, QuoteError> {
    let pair = response
        .pairs
        .and_then(|pairs| pairs.into_iter().next())
        .ok_or_else(|| QuoteError::NotFound(token_address.to_string()))?;

    Ok(MarketQuote {
        symbol: pair.base_token.symbol,
        name: pair.base_token.name,
        price_usd: pair.price_usd.as_ref().and_then(parse_decimal),
        market_cap: pair.market_cap.as_ref().and_then(parse_decimal),
        url: pair.url,
    })
}

/// Accept a JSON number or numeric string; anything else is absent.
fn parse_decimal(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}
