// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Signup and login issue working session tokens
//! 2. Protected routes reject missing (401) and invalid (403) tokens
//! 3. App users can only reach their own data unless they are admin
//! 4. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

mod common;
use common::{create_offline_app, seed_account, send};

/// Create a test JWT token with arbitrary claims.
fn create_test_jwt(sub: &str, role: &str, signing_key: &[u8], exp_offset: i64) -> String {
    #[derive(Serialize)]
    struct Claims {
        sub: String,
        username: String,
        role: String,
        exp: usize,
        iat: usize,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: sub.to_string(),
        username: sub.to_string(),
        role: role.to_string(),
        exp: (now + exp_offset) as usize,
        iat: now as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}

#[tokio::test]
async fn test_signup_then_login() {
    let (app, _) = create_offline_app();

    let (status, body) = send(
        &app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({"username": "alice", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["role"], "appUser");
    assert!(body["user"].get("password_hash").is_none());
    let user_id = body["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"username": "alice", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, profile) = send(
        &app,
        "GET",
        &format!("/app-users/{}", user_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "alice");
}

#[tokio::test]
async fn test_signup_duplicate_username_conflicts() {
    let (app, _) = create_offline_app();
    let creds = json!({"username": "alice", "password": "secret123"});

    send(&app, "POST", "/auth/signup", None, Some(creds.clone())).await;
    let (status, body) = send(&app, "POST", "/auth/signup", None, Some(creds)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let (app, _) = create_offline_app();

    let (status, _) = send(
        &app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({"username": "alice", "password": "123"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let (app, _) = create_offline_app();
    send(
        &app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({"username": "alice", "password": "secret123"})),
    )
    .await;

    let (status_unknown, body_unknown) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"username": "nobody", "password": "secret123"})),
    )
    .await;
    let (status_wrong, body_wrong) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"username": "alice", "password": "wrong-pass"})),
    )
    .await;

    assert_eq!(status_unknown, StatusCode::BAD_REQUEST);
    assert_eq!(status_wrong, StatusCode::BAD_REQUEST);
    assert_eq!(body_unknown, body_wrong);
    assert_eq!(body_wrong["details"], "Invalid username or password");
}

#[tokio::test]
async fn test_inactive_account_cannot_login() {
    let (app, state) = create_offline_app();
    let (mut app_user, _) = seed_account(&state, "carol", false).await;
    app_user.is_active = false;
    state.db.save_app_user(&app_user).await.unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"username": "carol", "password": "user-pass"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = create_offline_app();

    let (status, body) = send(&app, "GET", "/app-users/abc/influencers", None, None).await;

    // Should return 401 Unauthorized without token
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _) = create_offline_app();

    let (status, body) = send(
        &app,
        "GET",
        "/app-users/abc/influencers",
        Some("invalid.token.here"),
        None,
    )
    .await;

    // A token that fails verification is Forbidden, not Unauthorized
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_expired_or_foreign_token_rejected() {
    let (app, state) = create_offline_app();
    let expired = create_test_jwt("abc", "appUser", &state.config.jwt_secret, -3600);
    let foreign = create_test_jwt("abc", "appUser", b"some-other-signing-key-entirely", 3600);

    for token in [expired, foreign] {
        let (status, _) = send(
            &app,
            "GET",
            "/app-users/abc/influencers",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_session_cookie_accepted() {
    let (app, state) = create_offline_app();
    let (app_user, token) = seed_account(&state, "alice", false).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/app-users/{}", app_user.id))
                .header(header::COOKIE, format!("coin_tracker_token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_other_users_data_forbidden() {
    let (app, state) = create_offline_app();
    let (alice, _) = seed_account(&state, "alice", false).await;
    let (_, bob_token) = seed_account(&state, "bob", false).await;
    let (_, admin_token) = seed_account(&state, "root", true).await;

    let uri = format!("/app-users/{}/influencers", alice.id);

    let (status, body) = send(&app, "GET", &uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = send(&app, "GET", &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = create_offline_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/users")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // OPTIONS should return 200 (CORS preflight success)
    assert_eq!(response.status(), StatusCode::OK);

    // Should have CORS headers
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_public_route_no_auth_required() {
    let (app, _) = create_offline_app();

    let (status, body) = send(&app, "GET", "/health", None, None).await;

    // Health should be accessible without auth
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
