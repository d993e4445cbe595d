//! Influencer model, embedded in an app user's document.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::coin::{Coin, CoinHolder};
use crate::models::ids::generate_id;

/// An influencer tracked by an app user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Influencer {
    pub id: String,
    pub name: String,
    /// Social media handle (e.g. "@someone")
    pub social_handle: String,
    /// Coins in the order they were recorded
    #[serde(default)]
    pub coins: Vec<Coin>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Influencer {
    pub fn new(name: &str, social_handle: &str) -> Self {
        Self {
            id: generate_id(),
            name: name.to_string(),
            social_handle: social_handle.to_string(),
            coins: Vec::new(),
            is_favorite: false,
        }
    }
}

impl CoinHolder for Influencer {
    fn holder_id(&self) -> &str {
        &self.id
    }

    fn holder_name(&self) -> &str {
        &self.name
    }

    fn coins(&self) -> &[Coin] {
        &self.coins
    }

    fn coins_mut(&mut self) -> &mut Vec<Coin> {
        &mut self.coins
    }
}
