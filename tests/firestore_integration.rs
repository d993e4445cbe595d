// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running and
//! FIRESTORE_EMULATOR_HOST to point at it; otherwise they are skipped.
//!
//! The emulator keeps state between tests, so every test uses unique names.

use chrono::{TimeZone, Utc};
use coin_tracker::models::{AppUser, Category, Coin, Influencer, Role, User};
use coin_tracker::services::accounts;

mod common;
use common::test_db;

/// Unique suffix for test isolation.
fn unique_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
        .to_string()
}

fn test_coin(id: &str, token_address: &str) -> Coin {
    Coin {
        id: id.to_string(),
        symbol: id.to_uppercase(),
        name: format!("{} token", id),
        token_address: token_address.to_string(),
        share_date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        share_price: Some(0.25),
        share_market_cap: Some(1_000_000.0),
        is_favorite: false,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_round_trip_with_coins() {
    require_emulator!();

    let db = test_db().await;
    let mut user = User::new(&format!("alice-{}", unique_suffix()), "@alice", Category::Trusted);

    // Initially, user should not exist
    assert!(db.get_user(&user.id).await.unwrap().is_none());

    user.coins = vec![test_coin("a", "addr-a"), test_coin("b", "addr-b")];
    db.save_user(&user).await.unwrap();

    let fetched = db.get_user(&user.id).await.unwrap().expect("user exists");
    assert_eq!(fetched.name, user.name);
    assert_eq!(fetched.category, Category::Trusted);
    assert_eq!(fetched.coins, user.coins, "coin order and fields survive");
}

#[tokio::test]
async fn test_user_save_overwrites() {
    require_emulator!();

    let db = test_db().await;
    let mut user = User::new("bob", "@bob", Category::Neutral);
    db.save_user(&user).await.unwrap();

    user.is_favorite = true;
    user.coins.push(test_coin("c", "addr-c"));
    db.save_user(&user).await.unwrap();

    let fetched = db.get_user(&user.id).await.unwrap().unwrap();
    assert!(fetched.is_favorite);
    assert_eq!(fetched.coins.len(), 1);
}

#[tokio::test]
async fn test_user_deletion() {
    require_emulator!();

    let db = test_db().await;
    let user = User::new("carol", "@carol", Category::MostTrusted);
    db.save_user(&user).await.unwrap();

    db.delete_user(&user.id).await.unwrap();

    assert!(db.get_user(&user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_users_in_creation_order() {
    require_emulator!();

    let db = test_db().await;
    let mut older = User::new("older", "@older", Category::Trusted);
    older.created_at = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
    let mut newer = User::new("newer", "@newer", Category::Trusted);
    newer.created_at = Utc.with_ymd_and_hms(2001, 1, 2, 0, 0, 0).unwrap();

    // Saved out of order on purpose.
    db.save_user(&newer).await.unwrap();
    db.save_user(&older).await.unwrap();

    let users = db.list_users().await.unwrap();
    let older_pos = users.iter().position(|u| u.id == older.id).unwrap();
    let newer_pos = users.iter().position(|u| u.id == newer.id).unwrap();
    assert!(older_pos < newer_pos);
}

#[tokio::test]
async fn test_list_users_orders_within_one_second() {
    require_emulator!();

    let db = test_db().await;
    let mut whole = User::new("whole", "@whole", Category::Trusted);
    whole.created_at = Utc.with_ymd_and_hms(2001, 2, 1, 0, 0, 5).unwrap();
    let mut later = User::new("later", "@later", Category::Trusted);
    later.created_at = whole.created_at + chrono::Duration::milliseconds(500);

    db.save_user(&later).await.unwrap();
    db.save_user(&whole).await.unwrap();

    let users = db.list_users().await.unwrap();
    let whole_pos = users.iter().position(|u| u.id == whole.id).unwrap();
    let later_pos = users.iter().position(|u| u.id == later.id).unwrap();
    assert!(whole_pos < later_pos);
}

// ═══════════════════════════════════════════════════════════════════════════
// APP USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_find_app_user_by_username() {
    require_emulator!();

    let db = test_db().await;
    let username = format!("user-{}", unique_suffix());
    let created = accounts::signup(&db, &username, "secret123").await.unwrap();

    let found = db
        .find_app_user_by_username(&username)
        .await
        .unwrap()
        .expect("app user exists");
    assert_eq!(found.id, created.id);
    assert_eq!(found.role, Role::AppUser);

    let missing = db
        .find_app_user_by_username(&format!("{}-nope", username))
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_nested_influencer_graph_persists() {
    require_emulator!();

    let db = test_db().await;
    let username = format!("graph-{}", unique_suffix());
    let mut app_user: AppUser = accounts::signup(&db, &username, "secret123").await.unwrap();

    let mut influencer = Influencer::new("whale", "@whale");
    influencer.coins = vec![test_coin("x", "addr-x")];
    app_user.influencers.push(influencer.clone());
    app_user.push_subscription = Some(serde_json::json!({"endpoint": "https://push.example"}));
    db.save_app_user(&app_user).await.unwrap();

    let fetched = db.get_app_user(&app_user.id).await.unwrap().unwrap();
    assert_eq!(fetched.influencers.len(), 1);
    assert_eq!(fetched.influencers[0].id, influencer.id);
    assert_eq!(fetched.influencers[0].coins, influencer.coins);
    assert!(fetched.push_subscription.is_some());
}

#[tokio::test]
async fn test_admin_lookup() {
    require_emulator!();

    let db = test_db().await;
    let username = format!("admin-{}", unique_suffix());
    accounts::ensure_admin(&db, &username, "admin-pass")
        .await
        .unwrap();

    let admin = db.find_admin().await.unwrap().expect("an admin exists");
    assert!(admin.is_admin());
}
