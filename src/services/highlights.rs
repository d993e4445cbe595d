// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Scope resolution for profit summaries.
//!
//! Loads the holders of a scope from the document store and hands them to
//! the aggregation engine. Users are flat holders; app users (and the admin)
//! hold coins through their influencers.

use std::sync::Arc;

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{CoinWithQuote, Influencer, SummaryRecord, User};
use crate::services::aggregation::AggregationEngine;
use crate::services::market_data::{MarketDataClient, QuoteSource};

/// What a summary is computed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every flat user
    AllUsers,
    /// One flat user
    User(String),
    /// The influencers of one app user
    AppUser(String),
    /// The influencers of the admin account
    Admin,
}

enum Holders {
    Users(Vec<User>),
    Influencers(Vec<Influencer>),
}

pub struct HighlightService<S = MarketDataClient> {
    db: Db,
    engine: Arc<AggregationEngine<S>>,
}

impl<S: QuoteSource> HighlightService<S> {
    pub fn new(db: Db, engine: Arc<AggregationEngine<S>>) -> Self {
        Self { db, engine }
    }

    /// Highlights and averages for one scope.
    pub async fn aggregate_one(&self, scope: &Scope) -> Result<SummaryRecord> {
        let summary = match self.load(scope).await? {
            Holders::Users(users) => self.engine.summarize(&users).await,
            Holders::Influencers(influencers) => self.engine.summarize(&influencers).await,
        };

        tracing::info!(
            ?scope,
            total_coins = summary.total_coin_count,
            valid_coins = summary.valid_coin_count,
            "Computed summary"
        );
        Ok(summary)
    }

    /// Highlights over the admin-owned influencer graph.
    pub async fn aggregate_admin(&self) -> Result<SummaryRecord> {
        self.aggregate_one(&Scope::Admin).await
    }

    /// Coins of a scope with current quotes, newest share first.
    pub async fn list_latest_with_quotes(&self, scope: &Scope) -> Result<Vec<CoinWithQuote>> {
        let rows = match self.load(scope).await? {
            Holders::Users(users) => self.engine.latest_with_quotes(&users).await,
            Holders::Influencers(influencers) => {
                self.engine.latest_with_quotes(&influencers).await
            }
        };
        Ok(rows)
    }

    async fn load(&self, scope: &Scope) -> Result<Holders> {
        match scope {
            Scope::AllUsers => Ok(Holders::Users(self.db.list_users().await?)),
            Scope::User(id) => {
                let user = self
                    .db
                    .get_user(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
                Ok(Holders::Users(vec![user]))
            }
            Scope::AppUser(id) => {
                let app_user = self
                    .db
                    .get_app_user(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("App user {} not found", id)))?;
                Ok(Holders::Influencers(app_user.influencers))
            }
            Scope::Admin => {
                let admin = self
                    .db
                    .find_admin()
                    .await?
                    .ok_or_else(|| AppError::NotFound("Admin user not found".to_string()))?;
                Ok(Holders::Influencers(admin.influencers))
            }
        }
    }
}
