// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated app user model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Influencer;
use crate::time_utils::format_utc_rfc3339;

/// Role of an app user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Admin,
    #[default]
    AppUser,
}

/// App user document stored in the `app_users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUser {
    /// Generated ID (also used as document ID)
    pub id: String,
    /// Unique login name
    pub username: String,
    /// PBKDF2 hash, see `services::password`
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(with = "crate::time_utils::sortable_rfc3339")]
    pub created_at: DateTime<Utc>,
    /// Influencers in the order they were added
    #[serde(default)]
    pub influencers: Vec<Influencer>,
    /// Email address for notifications (set by subscribing)
    #[serde(default)]
    pub email: Option<String>,
    /// Opaque web-push subscription blob from the browser
    #[serde(default)]
    pub push_subscription: Option<serde_json::Value>,
}

fn default_active() -> bool {
    true
}

impl AppUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn influencer_mut(&mut self, influencer_id: &str) -> Option<&mut Influencer> {
        self.influencers.iter_mut().find(|i| i.id == influencer_id)
    }

    /// Remove an influencer by ID, returning it if it existed.
    pub fn remove_influencer(&mut self, influencer_id: &str) -> Option<Influencer> {
        let index = self
            .influencers
            .iter()
            .position(|i| i.id == influencer_id)?;
        Some(self.influencers.remove(index))
    }
}

/// App user profile as returned by the API (never includes the password hash).
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AppUserResponse {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: String,
    pub influencers: Vec<Influencer>,
    pub email: Option<String>,
    pub has_push_subscription: bool,
}

impl From<AppUser> for AppUserResponse {
    fn from(user: AppUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            is_active: user.is_active,
            created_at: format_utc_rfc3339(user.created_at),
            influencers: user.influencers,
            email: user.email,
            has_push_subscription: user.push_subscription.is_some(),
        }
    }
}
