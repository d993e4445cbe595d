// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! App user accounts: signup, login and admin bootstrap.

use chrono::Utc;

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::ids::generate_id;
use crate::models::{AppUser, Role};
use crate::services::password::{hash_password, verify_password, PasswordError};

/// Same message for unknown user, wrong password and inactive account.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Create a regular account.
pub async fn signup(db: &Db, username: &str, password: &str) -> Result<AppUser> {
    if db.find_app_user_by_username(username).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Username {} is already taken",
            username
        )));
    }

    let app_user = new_app_user(username, password, Role::AppUser).await?;
    db.save_app_user(&app_user).await?;

    tracing::info!(app_user_id = %app_user.id, username, "App user signed up");
    Ok(app_user)
}

/// Check credentials and return the account.
pub async fn login(db: &Db, username: &str, password: &str) -> Result<AppUser> {
    let invalid = || AppError::BadRequest(INVALID_CREDENTIALS.to_string());

    let app_user = db
        .find_app_user_by_username(username)
        .await?
        .ok_or_else(invalid)?;

    let matches = check_password(password, &app_user.password_hash).await?;
    if !matches {
        tracing::info!(username, "Login rejected: wrong password");
        return Err(invalid());
    }

    if !app_user.is_active {
        tracing::info!(username, "Login rejected: account inactive");
        return Err(invalid());
    }

    Ok(app_user)
}

/// Make sure an admin account with these credentials exists.
///
/// An existing account with the username is promoted and its password
/// reset; otherwise a new admin is created.
pub async fn ensure_admin(db: &Db, username: &str, password: &str) -> Result<AppUser> {
    match db.find_app_user_by_username(username).await? {
        Some(mut existing) => {
            if !existing.is_admin() || !check_password(password, &existing.password_hash).await? {
                existing.role = Role::Admin;
                existing.is_active = true;
                existing.password_hash = hash_blocking(password).await?;
                db.save_app_user(&existing).await?;
                tracing::info!(username, "Existing account promoted to admin");
            }
            Ok(existing)
        }
        None => {
            let admin = new_app_user(username, password, Role::Admin).await?;
            db.save_app_user(&admin).await?;
            tracing::info!(username, "Admin account created");
            Ok(admin)
        }
    }
}

async fn new_app_user(username: &str, password: &str, role: Role) -> Result<AppUser> {
    Ok(AppUser {
        id: generate_id(),
        username: username.to_string(),
        password_hash: hash_blocking(password).await?,
        role,
        is_active: true,
        created_at: Utc::now(),
        influencers: Vec::new(),
        email: None,
        push_subscription: None,
    })
}

// PBKDF2 runs on the blocking pool.
async fn hash_blocking(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::Internal(e.into()))
}

async fn check_password(password: &str, stored: &str) -> Result<bool> {
    let password = password.to_string();
    let stored = stored.to_string();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    match verified {
        Ok(matches) => Ok(matches),
        Err(PasswordError::Malformed) => {
            tracing::warn!("Stored password hash is malformed");
            Ok(false)
        }
        Err(e) => Err(AppError::Internal(e.into())),
    }
}
