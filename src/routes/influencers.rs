// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Influencer and coin editing on an app user's document.
//!
//! App-user routes and admin routes edit the same nested shape; they only
//! differ in which document they load.

use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{AppUser, Coin, CoinHolder, CoinUpdate, Influencer};
use crate::routes::coins::{record_coin, FavoriteCoin, NewCoinRequest};
use crate::AppState;

/// Which app user document holds the influencers.
#[derive(Debug, Clone)]
pub enum Owner {
    AppUser(String),
    Admin,
}

impl Owner {
    pub async fn load(&self, state: &AppState) -> Result<AppUser> {
        match self {
            Owner::AppUser(id) => state
                .db
                .get_app_user(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("App user {} not found", id))),
            Owner::Admin => state
                .db
                .find_admin()
                .await?
                .ok_or_else(|| AppError::NotFound("Admin user not found".to_string())),
        }
    }

    /// Fetch, apply `f`, and write the document back when `f` succeeds.
    async fn modify<T>(
        &self,
        state: &AppState,
        f: impl FnOnce(&mut AppUser) -> Result<T>,
    ) -> Result<T> {
        let mut app_user = self.load(state).await?;
        let out = f(&mut app_user)?;
        state.db.save_app_user(&app_user).await?;
        Ok(out)
    }
}

fn influencer_not_found(influencer_id: &str) -> AppError {
    AppError::NotFound(format!("Influencer {} not found", influencer_id))
}

fn coin_not_found(coin_id: &str) -> AppError {
    AppError::NotFound(format!("Coin {} not found", coin_id))
}

fn influencer_mut<'a>(app_user: &'a mut AppUser, influencer_id: &str) -> Result<&'a mut Influencer> {
    app_user
        .influencer_mut(influencer_id)
        .ok_or_else(|| influencer_not_found(influencer_id))
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewInfluencerRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub social_handle: String,
}

// ─── Influencers ─────────────────────────────────────────────

pub async fn list_influencers(state: &AppState, owner: &Owner) -> Result<Vec<Influencer>> {
    Ok(owner.load(state).await?.influencers)
}

pub async fn favorite_influencers(state: &AppState, owner: &Owner) -> Result<Vec<Influencer>> {
    let mut influencers = owner.load(state).await?.influencers;
    influencers.retain(|i| i.is_favorite);
    Ok(influencers)
}

pub async fn add_influencer(
    state: &AppState,
    owner: &Owner,
    request: NewInfluencerRequest,
) -> Result<Influencer> {
    request.validate()?;
    let influencer = Influencer::new(request.name.trim(), request.social_handle.trim());

    let added = influencer.clone();
    owner
        .modify(state, move |app_user| {
            app_user.influencers.push(influencer);
            Ok(())
        })
        .await?;

    tracing::info!(?owner, influencer_id = %added.id, "Influencer added");
    Ok(added)
}

pub async fn get_influencer(
    state: &AppState,
    owner: &Owner,
    influencer_id: &str,
) -> Result<Influencer> {
    owner
        .load(state)
        .await?
        .influencers
        .into_iter()
        .find(|i| i.id == influencer_id)
        .ok_or_else(|| influencer_not_found(influencer_id))
}

pub async fn delete_influencer(state: &AppState, owner: &Owner, influencer_id: &str) -> Result<()> {
    owner
        .modify(state, |app_user| {
            app_user
                .remove_influencer(influencer_id)
                .map(|_| ())
                .ok_or_else(|| influencer_not_found(influencer_id))
        })
        .await?;

    tracing::info!(?owner, influencer_id, "Influencer deleted");
    Ok(())
}

pub async fn set_influencer_favorite(
    state: &AppState,
    owner: &Owner,
    influencer_id: &str,
    favorite: bool,
) -> Result<Influencer> {
    owner
        .modify(state, |app_user| {
            let influencer = influencer_mut(app_user, influencer_id)?;
            influencer.is_favorite = favorite;
            Ok(influencer.clone())
        })
        .await
}

// ─── Coins ───────────────────────────────────────────────────

pub async fn list_coins(state: &AppState, owner: &Owner, influencer_id: &str) -> Result<Vec<Coin>> {
    Ok(get_influencer(state, owner, influencer_id).await?.coins)
}

pub async fn get_coin(
    state: &AppState,
    owner: &Owner,
    influencer_id: &str,
    coin_id: &str,
) -> Result<Coin> {
    get_influencer(state, owner, influencer_id)
        .await?
        .coins
        .into_iter()
        .find(|c| c.id == coin_id)
        .ok_or_else(|| coin_not_found(coin_id))
}

pub async fn add_coin(
    state: &AppState,
    owner: &Owner,
    influencer_id: &str,
    request: NewCoinRequest,
) -> Result<Coin> {
    // Fail on a missing influencer before calling the provider.
    get_influencer(state, owner, influencer_id).await?;
    let coin = record_coin(state, request).await?;

    let added = coin.clone();
    owner
        .modify(state, move |app_user| {
            influencer_mut(app_user, influencer_id)?.coins.push(coin);
            Ok(())
        })
        .await?;
    Ok(added)
}

pub async fn update_coin(
    state: &AppState,
    owner: &Owner,
    influencer_id: &str,
    coin_id: &str,
    update: CoinUpdate,
) -> Result<Coin> {
    update.validate()?;
    owner
        .modify(state, |app_user| {
            let coin = influencer_mut(app_user, influencer_id)?
                .coin_mut(coin_id)
                .ok_or_else(|| coin_not_found(coin_id))?;
            coin.apply_update(&update);
            Ok(coin.clone())
        })
        .await
}

pub async fn delete_coin(
    state: &AppState,
    owner: &Owner,
    influencer_id: &str,
    coin_id: &str,
) -> Result<()> {
    owner
        .modify(state, |app_user| {
            influencer_mut(app_user, influencer_id)?
                .remove_coin(coin_id)
                .map(|_| ())
                .ok_or_else(|| coin_not_found(coin_id))
        })
        .await
}

pub async fn set_coin_favorite(
    state: &AppState,
    owner: &Owner,
    influencer_id: &str,
    coin_id: &str,
    favorite: bool,
) -> Result<Coin> {
    owner
        .modify(state, |app_user| {
            let coin = influencer_mut(app_user, influencer_id)?
                .coin_mut(coin_id)
                .ok_or_else(|| coin_not_found(coin_id))?;
            coin.is_favorite = favorite;
            Ok(coin.clone())
        })
        .await
}

/// Favorite coins across the owner's influencers.
pub async fn favorite_coins(state: &AppState, owner: &Owner) -> Result<Vec<FavoriteCoin>> {
    let app_user = owner.load(state).await?;

    Ok(app_user
        .influencers
        .into_iter()
        .flat_map(|influencer| {
            let Influencer {
                id,
                name,
                social_handle,
                coins,
                ..
            } = influencer;
            coins
                .into_iter()
                .filter(|c| c.is_favorite)
                .map(move |coin| FavoriteCoin {
                    coin,
                    holder_id: id.clone(),
                    holder_name: name.clone(),
                    holder_social_handle: social_handle.clone(),
                })
        })
        .collect())
}
