// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod app_user;
pub mod coin;
pub mod ids;
pub mod influencer;
pub mod quote;
pub mod summary;
pub mod user;

pub use app_user::{AppUser, AppUserResponse, Role};
pub use coin::{Coin, CoinHolder, CoinUpdate};
pub use influencer::Influencer;
pub use quote::MarketQuote;
pub use summary::{
    CoinWithQuote, EntityAverage, EntityCoinCount, EntityProfit, HighlightCoin, SummaryRecord,
};
pub use user::{Category, User};
