//! Flat user model: a tracked account that owns coins directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::coin::{Coin, CoinHolder};
use crate::models::ids::generate_id;

/// Trust category of a tracked user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    MostTrusted,
    Trusted,
    Neutral,
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "most_trusted" => Ok(Self::MostTrusted),
            "trusted" => Ok(Self::Trusted),
            "neutral" => Ok(Self::Neutral),
            other => Err(format!("Unknown category: {}", other)),
        }
    }
}

/// User document stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Generated ID (also used as document ID)
    pub id: String,
    pub name: String,
    /// Social media handle
    pub social_handle: String,
    pub category: Category,
    #[serde(default)]
    pub is_favorite: bool,
    /// Creation time, defines listing order
    #[serde(with = "crate::time_utils::sortable_rfc3339")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub coins: Vec<Coin>,
}

impl User {
    pub fn new(name: &str, social_handle: &str, category: Category) -> Self {
        Self {
            id: generate_id(),
            name: name.to_string(),
            social_handle: social_handle.to_string(),
            category,
            is_favorite: false,
            created_at: Utc::now(),
            coins: Vec::new(),
        }
    }
}

impl CoinHolder for User {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_format() {
        let json = serde_json::to_string(&Category::MostTrusted).unwrap();
        assert_eq!(json, "\"most_trusted\"");
        assert_eq!("neutral".parse::<Category>(), Ok(Category::Neutral));
        assert!("favorites".parse::<Category>().is_err());
    }
}
