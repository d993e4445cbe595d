// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin-curated influencer graph.
//!
//! Summaries over the admin graph are public; reading the graph needs a
//! session and editing it needs the admin role.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Coin, CoinUpdate, CoinWithQuote, Influencer, SummaryRecord};
use crate::routes::coins::{
    average_profits, AverageProfit, FavoriteCoin, MessageResponse, NewCoinRequest,
};
use crate::routes::influencers::{self, NewInfluencerRequest, Owner};
use crate::services::Scope;
use crate::AppState;

/// Read-only summaries, no auth.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/highlights", get(get_highlights))
        .route("/admin/average-profits", get(get_average_profits))
        .route("/admin/latest-coins", get(get_latest_coins))
}

/// Graph access; the auth middleware is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/admin/influencers",
            get(list_influencers).post(add_influencer),
        )
        .route(
            "/admin/influencers/{influencer_id}",
            get(get_influencer).delete(delete_influencer),
        )
        .route(
            "/admin/influencers/{influencer_id}/favorite",
            put(favorite_influencer).delete(unfavorite_influencer),
        )
        .route(
            "/admin/influencers/{influencer_id}/coins",
            get(list_coins).post(add_coin),
        )
        .route(
            "/admin/influencers/{influencer_id}/coins/{coin_id}",
            put(update_coin).delete(delete_coin),
        )
        .route(
            "/admin/influencers/{influencer_id}/coins/{coin_id}/favorite",
            put(favorite_coin).delete(unfavorite_coin),
        )
        .route("/admin/favorites", get(list_favorite_coins))
}

// ─── Summaries ───────────────────────────────────────────────

async fn get_highlights(State(state): State<Arc<AppState>>) -> Result<Json<SummaryRecord>> {
    Ok(Json(state.highlights.aggregate_admin().await?))
}

async fn get_average_profits(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AverageProfit>>> {
    let summary = state.highlights.aggregate_admin().await?;
    Ok(Json(average_profits(summary)))
}

async fn get_latest_coins(State(state): State<Arc<AppState>>) -> Result<Json<Vec<CoinWithQuote>>> {
    Ok(Json(
        state
            .highlights
            .list_latest_with_quotes(&Scope::Admin)
            .await?,
    ))
}

// ─── Influencers ─────────────────────────────────────────────

async fn list_influencers(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Influencer>>> {
    Ok(Json(
        influencers::list_influencers(&state, &Owner::Admin).await?,
    ))
}

async fn get_influencer(
    State(state): State<Arc<AppState>>,
    Path(influencer_id): Path<String>,
) -> Result<Json<Influencer>> {
    Ok(Json(
        influencers::get_influencer(&state, &Owner::Admin, &influencer_id).await?,
    ))
}

async fn add_influencer(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<NewInfluencerRequest>,
) -> Result<(StatusCode, Json<Influencer>)> {
    auth.ensure_admin()?;
    let influencer = influencers::add_influencer(&state, &Owner::Admin, body).await?;
    Ok((StatusCode::CREATED, Json(influencer)))
}

async fn delete_influencer(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(influencer_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    auth.ensure_admin()?;
    influencers::delete_influencer(&state, &Owner::Admin, &influencer_id).await?;
    Ok(Json(MessageResponse::new("Influencer deleted")))
}

async fn favorite_influencer(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(influencer_id): Path<String>,
) -> Result<Json<Influencer>> {
    auth.ensure_admin()?;
    Ok(Json(
        influencers::set_influencer_favorite(&state, &Owner::Admin, &influencer_id, true).await?,
    ))
}

async fn unfavorite_influencer(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(influencer_id): Path<String>,
) -> Result<Json<Influencer>> {
    auth.ensure_admin()?;
    Ok(Json(
        influencers::set_influencer_favorite(&state, &Owner::Admin, &influencer_id, false)
            .await?,
    ))
}

// ─── Coins ───────────────────────────────────────────────────

async fn list_coins(
    State(state): State<Arc<AppState>>,
    Path(influencer_id): Path<String>,
) -> Result<Json<Vec<Coin>>> {
    Ok(Json(
        influencers::list_coins(&state, &Owner::Admin, &influencer_id).await?,
    ))
}

async fn add_coin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(influencer_id): Path<String>,
    Json(body): Json<NewCoinRequest>,
) -> Result<(StatusCode, Json<Coin>)> {
    auth.ensure_admin()?;
    let coin = influencers::add_coin(&state, &Owner::Admin, &influencer_id, body).await?;
    Ok((StatusCode::CREATED, Json(coin)))
}

async fn update_coin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((influencer_id, coin_id)): Path<(String, String)>,
    Json(body): Json<CoinUpdate>,
) -> Result<Json<Coin>> {
    auth.ensure_admin()?;
    Ok(Json(
        influencers::update_coin(&state, &Owner::Admin, &influencer_id, &coin_id, body).await?,
    ))
}

async fn delete_coin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((influencer_id, coin_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>> {
    auth.ensure_admin()?;
    influencers::delete_coin(&state, &Owner::Admin, &influencer_id, &coin_id).await?;
    Ok(Json(MessageResponse::new("Coin deleted")))
}

async fn favorite_coin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((influencer_id, coin_id)): Path<(String, String)>,
) -> Result<Json<Coin>> {
    auth.ensure_admin()?;
    Ok(Json(
        influencers::set_coin_favorite(&state, &Owner::Admin, &influencer_id, &coin_id, true)
            .await?,
    ))
}

async fn unfavorite_coin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((influencer_id, coin_id)): Path<(String, String)>,
) -> Result<Json<Coin>> {
    auth.ensure_admin()?;
    Ok(Json(
        influencers::set_coin_favorite(&state, &Owner::Admin, &influencer_id, &coin_id, false)
            .await?,
    ))
}

async fn list_favorite_coins(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<FavoriteCoin>>> {
    auth.ensure_admin()?;
    Ok(Json(
        influencers::favorite_coins(&state, &Owner::Admin).await?,
    ))
}
