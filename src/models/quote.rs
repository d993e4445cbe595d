//! Market quotes from the external price provider.

use serde::{Deserialize, Serialize};

/// Quote for a token, taken from the provider's first trading pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    pub symbol: String,
    pub name: String,
    /// Current price in USD
    pub price_usd: Option<f64>,
    /// Current market cap in USD
    pub market_cap: Option<f64>,
    /// Provider page for the pair
    pub url: Option<String>,
}
