// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flat user routes: users own their coins directly.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{
    Category, Coin, CoinHolder, CoinUpdate, CoinWithQuote, SummaryRecord, User,
};
use crate::routes::coins::{
    average_profits, record_coin, AverageProfit, FavoriteCoin, MessageResponse, NewCoinRequest,
};
use crate::services::Scope;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/highlights", get(get_highlights))
        .route("/users/average-profits", get(get_average_profits))
        .route("/users/coins/favorites", get(list_favorite_coins))
        .route("/users/category/{category}", get(list_by_category))
        .route("/users/{id}", get(get_user).delete(delete_user))
        .route(
            "/users/{id}/favorite",
            put(favorite_user).delete(unfavorite_user),
        )
        .route("/users/{id}/coins", axum::routing::post(add_coin))
        .route(
            "/users/{id}/coins/{coin_id}",
            put(update_coin).delete(delete_coin),
        )
        .route(
            "/users/{id}/coins/{coin_id}/favorite",
            put(favorite_coin).delete(unfavorite_coin),
        )
        .route("/users/{id}/highlights", get(get_user_highlights))
        .route("/users/{id}/latest-coins", get(get_user_latest_coins))
}

async fn load_user(state: &AppState, user_id: &str) -> Result<User> {
    state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
}

fn coin_not_found(coin_id: &str) -> AppError {
    AppError::NotFound(format!("Coin {} not found", coin_id))
}

// ─── Users ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    favorite: Option<bool>,
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<User>>> {
    let mut users = state.db.list_users().await?;
    if query.favorite == Some(true) {
        users.retain(|u| u.is_favorite);
    }
    Ok(Json(users))
}

#[derive(Deserialize, Validate)]
struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    name: String,
    #[validate(length(min = 1, max = 100))]
    social_handle: String,
    category: Category,
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    body.validate()?;

    let user = User::new(body.name.trim(), body.social_handle.trim(), body.category);
    state.db.save_user(&user).await?;

    tracing::info!(user_id = %user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<User>>> {
    let category: Category = category.parse().map_err(AppError::BadRequest)?;
    let mut users = state.db.list_users().await?;
    users.retain(|u| u.category == category);
    Ok(Json(users))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    Ok(Json(load_user(&state, &id).await?))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    load_user(&state, &id).await?;
    state.db.delete_user(&id).await?;

    tracing::info!(user_id = %id, "User deleted");
    Ok(Json(MessageResponse::new("User deleted")))
}

async fn set_user_favorite(state: &AppState, id: &str, favorite: bool) -> Result<User> {
    let mut user = load_user(state, id).await?;
    user.is_favorite = favorite;
    state.db.save_user(&user).await?;
    Ok(user)
}

async fn favorite_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    Ok(Json(set_user_favorite(&state, &id, true).await?))
}

async fn unfavorite_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    Ok(Json(set_user_favorite(&state, &id, false).await?))
}

// ─── Coins ───────────────────────────────────────────────────

async fn add_coin(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<NewCoinRequest>,
) -> Result<(StatusCode, Json<Coin>)> {
    let mut user = load_user(&state, &id).await?;
    let coin = record_coin(&state, body).await?;

    user.coins.push(coin.clone());
    state.db.save_user(&user).await?;

    Ok((StatusCode::CREATED, Json(coin)))
}

async fn update_coin(
    State(state): State<Arc<AppState>>,
    Path((id, coin_id)): Path<(String, String)>,
    Json(body): Json<CoinUpdate>,
) -> Result<Json<Coin>> {
    body.validate()?;

    let mut user = load_user(&state, &id).await?;
    let coin = user
        .coin_mut(&coin_id)
        .ok_or_else(|| coin_not_found(&coin_id))?;
    coin.apply_update(&body);
    let updated = coin.clone();

    state.db.save_user(&user).await?;
    Ok(Json(updated))
}

async fn delete_coin(
    State(state): State<Arc<AppState>>,
    Path((id, coin_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>> {
    let mut user = load_user(&state, &id).await?;
    user.remove_coin(&coin_id)
        .ok_or_else(|| coin_not_found(&coin_id))?;
    state.db.save_user(&user).await?;
    Ok(Json(MessageResponse::new("Coin deleted")))
}

async fn set_coin_favorite(
    state: &AppState,
    id: &str,
    coin_id: &str,
    favorite: bool,
) -> Result<Coin> {
    let mut user = load_user(state, id).await?;
    let coin = user.coin_mut(coin_id).ok_or_else(|| coin_not_found(coin_id))?;
    coin.is_favorite = favorite;
    let updated = coin.clone();
    state.db.save_user(&user).await?;
    Ok(updated)
}

async fn favorite_coin(
    State(state): State<Arc<AppState>>,
    Path((id, coin_id)): Path<(String, String)>,
) -> Result<Json<Coin>> {
    Ok(Json(set_coin_favorite(&state, &id, &coin_id, true).await?))
}

async fn unfavorite_coin(
    State(state): State<Arc<AppState>>,
    Path((id, coin_id)): Path<(String, String)>,
) -> Result<Json<Coin>> {
    Ok(Json(set_coin_favorite(&state, &id, &coin_id, false).await?))
}

/// Favorite coins across all users, with their owner.
async fn list_favorite_coins(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FavoriteCoin>>> {
    let users = state.db.list_users().await?;

    let favorites = users
        .into_iter()
        .flat_map(|user| {
            let User {
                id,
                name,
                social_handle,
                coins,
                ..
            } = user;
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
        .collect();

    Ok(Json(favorites))
}

// ─── Summaries ───────────────────────────────────────────────

async fn get_highlights(State(state): State<Arc<AppState>>) -> Result<Json<SummaryRecord>> {
    Ok(Json(state.highlights.aggregate_one(&Scope::AllUsers).await?))
}

async fn get_average_profits(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AverageProfit>>> {
    let summary = state.highlights.aggregate_one(&Scope::AllUsers).await?;
    Ok(Json(average_profits(summary)))
}

async fn get_user_highlights(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SummaryRecord>> {
    Ok(Json(state.highlights.aggregate_one(&Scope::User(id)).await?))
}

async fn get_user_latest_coins(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CoinWithQuote>>> {
    Ok(Json(
        state
            .highlights
            .list_latest_with_quotes(&Scope::User(id))
            .await?,
    ))
}
