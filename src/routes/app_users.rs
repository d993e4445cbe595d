// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! App user routes (require authentication; owner or admin only).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{AppUserResponse, Coin, CoinUpdate, CoinWithQuote, Influencer, SummaryRecord};
use crate::routes::coins::{FavoriteCoin, MessageResponse, NewCoinRequest, ProfitBreakdown};
use crate::routes::influencers::{self, NewInfluencerRequest, Owner};
use crate::services::Scope;
use crate::AppState;

/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/app-users/{id}", get(get_profile))
        .route("/app-users/{id}/subscribe-email", post(subscribe_email))
        .route("/app-users/{id}/unsubscribe-email", post(unsubscribe_email))
        .route(
            "/app-users/{id}/push-subscription",
            put(set_push_subscription).delete(clear_push_subscription),
        )
        .route(
            "/app-users/{id}/influencers",
            get(list_influencers).post(add_influencer),
        )
        .route(
            "/app-users/{id}/influencers/favorites",
            get(list_favorite_influencers),
        )
        .route(
            "/app-users/{id}/influencers/{influencer_id}",
            get(get_influencer).delete(delete_influencer),
        )
        .route(
            "/app-users/{id}/influencers/{influencer_id}/favorite",
            put(favorite_influencer).delete(unfavorite_influencer),
        )
        .route(
            "/app-users/{id}/influencers/{influencer_id}/coins",
            get(list_coins).post(add_coin),
        )
        .route(
            "/app-users/{id}/influencers/{influencer_id}/coins/{coin_id}",
            get(get_coin).put(update_coin).delete(delete_coin),
        )
        .route(
            "/app-users/{id}/influencers/{influencer_id}/coins/{coin_id}/favorite",
            put(favorite_coin).delete(unfavorite_coin),
        )
        .route("/app-users/{id}/favorites", get(list_favorite_coins))
        .route("/app-users/{id}/highlights", get(get_highlights))
        .route("/app-users/{id}/average-profits", get(get_average_profits))
        .route("/app-users/{id}/latest-coins", get(get_latest_coins))
}

/// Check access and name the document to work on.
fn owner(auth: &AuthUser, app_user_id: String) -> Result<Owner> {
    auth.ensure_can_access(&app_user_id)?;
    Ok(Owner::AppUser(app_user_id))
}

// ─── Profile & Notifications ─────────────────────────────────

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<AppUserResponse>> {
    let app_user = owner(&auth, id)?.load(&state).await?;
    Ok(Json(app_user.into()))
}

#[derive(Deserialize, Validate)]
struct SubscribeEmailRequest {
    #[validate(email)]
    email: String,
}

async fn subscribe_email(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<SubscribeEmailRequest>,
) -> Result<Json<MessageResponse>> {
    body.validate()?;

    let mut app_user = owner(&auth, id)?.load(&state).await?;
    app_user.email = Some(body.email.trim().to_string());
    state.db.save_app_user(&app_user).await?;

    tracing::info!(app_user_id = %app_user.id, "Email subscription stored");
    Ok(Json(MessageResponse::new("Email subscription successful")))
}

async fn unsubscribe_email(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let mut app_user = owner(&auth, id)?.load(&state).await?;
    app_user.email = None;
    state.db.save_app_user(&app_user).await?;
    Ok(Json(MessageResponse::new("Email subscription cancelled")))
}

async fn set_push_subscription(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(subscription): Json<serde_json::Value>,
) -> Result<Json<MessageResponse>> {
    if !subscription.is_object() {
        return Err(crate::error::AppError::BadRequest(
            "Push subscription must be a JSON object".to_string(),
        ));
    }

    let mut app_user = owner(&auth, id)?.load(&state).await?;
    app_user.push_subscription = Some(subscription);
    state.db.save_app_user(&app_user).await?;
    Ok(Json(MessageResponse::new("Push subscription stored")))
}

async fn clear_push_subscription(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let mut app_user = owner(&auth, id)?.load(&state).await?;
    app_user.push_subscription = None;
    state.db.save_app_user(&app_user).await?;
    Ok(Json(MessageResponse::new("Push subscription removed")))
}

// ─── Influencers ─────────────────────────────────────────────

async fn list_influencers(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Influencer>>> {
    let owner = owner(&auth, id)?;
    Ok(Json(influencers::list_influencers(&state, &owner).await?))
}

async fn list_favorite_influencers(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Influencer>>> {
    let owner = owner(&auth, id)?;
    Ok(Json(influencers::favorite_influencers(&state, &owner).await?))
}

async fn add_influencer(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<NewInfluencerRequest>,
) -> Result<(StatusCode, Json<Influencer>)> {
    let owner = owner(&auth, id)?;
    let influencer = influencers::add_influencer(&state, &owner, body).await?;
    Ok((StatusCode::CREATED, Json(influencer)))
}

async fn get_influencer(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, influencer_id)): Path<(String, String)>,
) -> Result<Json<Influencer>> {
    let owner = owner(&auth, id)?;
    Ok(Json(
        influencers::get_influencer(&state, &owner, &influencer_id).await?,
    ))
}

async fn delete_influencer(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, influencer_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>> {
    let owner = owner(&auth, id)?;
    influencers::delete_influencer(&state, &owner, &influencer_id).await?;
    Ok(Json(MessageResponse::new("Influencer deleted")))
}

async fn favorite_influencer(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, influencer_id)): Path<(String, String)>,
) -> Result<Json<Influencer>> {
    let owner = owner(&auth, id)?;
    Ok(Json(
        influencers::set_influencer_favorite(&state, &owner, &influencer_id, true).await?,
    ))
}

async fn unfavorite_influencer(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, influencer_id)): Path<(String, String)>,
) -> Result<Json<Influencer>> {
    let owner = owner(&auth, id)?;
    Ok(Json(
        influencers::set_influencer_favorite(&state, &owner, &influencer_id, false).await?,
    ))
}

// ─── Coins ───────────────────────────────────────────────────

async fn list_coins(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, influencer_id)): Path<(String, String)>,
) -> Result<Json<Vec<Coin>>> {
    let owner = owner(&auth, id)?;
    Ok(Json(
        influencers::list_coins(&state, &owner, &influencer_id).await?,
    ))
}

async fn add_coin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, influencer_id)): Path<(String, String)>,
    Json(body): Json<NewCoinRequest>,
) -> Result<(StatusCode, Json<Coin>)> {
    let owner = owner(&auth, id)?;
    let coin = influencers::add_coin(&state, &owner, &influencer_id, body).await?;
    Ok((StatusCode::CREATED, Json(coin)))
}

async fn get_coin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, influencer_id, coin_id)): Path<(String, String, String)>,
) -> Result<Json<Coin>> {
    let owner = owner(&auth, id)?;
    Ok(Json(
        influencers::get_coin(&state, &owner, &influencer_id, &coin_id).await?,
    ))
}

async fn update_coin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, influencer_id, coin_id)): Path<(String, String, String)>,
    Json(body): Json<CoinUpdate>,
) -> Result<Json<Coin>> {
    let owner = owner(&auth, id)?;
    Ok(Json(
        influencers::update_coin(&state, &owner, &influencer_id, &coin_id, body).await?,
    ))
}

async fn delete_coin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, influencer_id, coin_id)): Path<(String, String, String)>,
) -> Result<Json<MessageResponse>> {
    let owner = owner(&auth, id)?;
    influencers::delete_coin(&state, &owner, &influencer_id, &coin_id).await?;
    Ok(Json(MessageResponse::new("Coin deleted")))
}

async fn favorite_coin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, influencer_id, coin_id)): Path<(String, String, String)>,
) -> Result<Json<Coin>> {
    let owner = owner(&auth, id)?;
    Ok(Json(
        influencers::set_coin_favorite(&state, &owner, &influencer_id, &coin_id, true).await?,
    ))
}

async fn unfavorite_coin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, influencer_id, coin_id)): Path<(String, String, String)>,
) -> Result<Json<Coin>> {
    let owner = owner(&auth, id)?;
    Ok(Json(
        influencers::set_coin_favorite(&state, &owner, &influencer_id, &coin_id, false).await?,
    ))
}

async fn list_favorite_coins(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<FavoriteCoin>>> {
    let owner = owner(&auth, id)?;
    Ok(Json(influencers::favorite_coins(&state, &owner).await?))
}

// ─── Summaries ───────────────────────────────────────────────

async fn get_highlights(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<SummaryRecord>> {
    auth.ensure_can_access(&id)?;
    Ok(Json(
        state.highlights.aggregate_one(&Scope::AppUser(id)).await?,
    ))
}

async fn get_average_profits(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ProfitBreakdown>> {
    auth.ensure_can_access(&id)?;
    let summary = state
        .highlights
        .aggregate_one(&Scope::AppUser(id.clone()))
        .await?;
    Ok(Json(ProfitBreakdown::from_summary(id, summary)))
}

async fn get_latest_coins(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CoinWithQuote>>> {
    auth.ensure_can_access(&id)?;
    Ok(Json(
        state
            .highlights
            .list_latest_with_quotes(&Scope::AppUser(id))
            .await?,
    ))
}
