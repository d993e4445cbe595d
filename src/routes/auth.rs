// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signup and login routes.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::{AppUser, AppUserResponse};
use crate::services::accounts;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Session token plus the account it belongs to.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub token: String,
    pub user: AppUserResponse,
}

/// Issue a session for the account: JSON token and HttpOnly cookie.
fn session_response(
    state: &AppState,
    jar: CookieJar,
    app_user: AppUser,
    status: StatusCode,
) -> Result<impl IntoResponse> {
    let token = create_jwt(
        &app_user,
        &state.config.jwt_secret,
        state.config.jwt_expires_in_secs,
    )
    .map_err(AppError::Internal)?;

    let secure = !state.config.frontend_url.starts_with("http://localhost");
    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            state.config.jwt_expires_in_secs as i64,
        ))
        .build();

    Ok((
        status,
        jar.add(cookie),
        Json(AuthResponse {
            token,
            user: app_user.into(),
        }),
    ))
}

async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<CredentialsRequest>,
) -> Result<impl IntoResponse> {
    body.validate()?;
    let app_user = accounts::signup(&state.db, body.username.trim(), &body.password).await?;
    session_response(&state, jar, app_user, StatusCode::CREATED)
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<CredentialsRequest>,
) -> Result<impl IntoResponse> {
    // Shape errors look the same as bad credentials.
    if body.validate().is_err() {
        return Err(AppError::BadRequest(
            accounts::INVALID_CREDENTIALS.to_string(),
        ));
    }
    let app_user = accounts::login(&state.db, body.username.trim(), &body.password).await?;

    tracing::info!(app_user_id = %app_user.id, "App user logged in");
    session_response(&state, jar, app_user, StatusCode::OK)
}

async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}
