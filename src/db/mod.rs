//! Database layer (Firestore, or in-memory when no project is configured).
//!
//! Nested data (influencers, coins) lives inside its owning document, so
//! every nested mutation is a fetch-modify-write of that document.

pub mod firestore;
pub mod memory;

use std::sync::Arc;

use crate::error::AppError;
use crate::models::{AppUser, User};

pub use self::firestore::FirestoreStore;
pub use self::memory::MemoryStore;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const APP_USERS: &str = "app_users";
}

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreStore),
    Memory(Arc<MemoryStore>),
}

/// Document store handle shared by all handlers.
#[derive(Clone)]
pub struct Db {
    backend: Backend,
}

impl Db {
    /// Connect to Firestore for the given project.
    pub async fn firestore(project_id: &str) -> Result<Self, AppError> {
        Ok(Self {
            backend: Backend::Firestore(FirestoreStore::connect(project_id).await?),
        })
    }

    /// Empty in-memory store.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::new())),
        }
    }

    // ─── Users ───────────────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(fs) => fs.get_user(user_id).await,
            Backend::Memory(mem) => Ok(mem.get_user(user_id)),
        }
    }

    /// All users in creation order.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        match &self.backend {
            Backend::Firestore(fs) => fs.list_users().await,
            Backend::Memory(mem) => Ok(mem.list_users()),
        }
    }

    pub async fn save_user(&self, user: &User) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(fs) => fs.save_user(user).await,
            Backend::Memory(mem) => {
                mem.save_user(user);
                Ok(())
            }
        }
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(fs) => fs.delete_user(user_id).await,
            Backend::Memory(mem) => {
                mem.delete_user(user_id);
                Ok(())
            }
        }
    }

    // ─── App Users ───────────────────────────────────────────────

    pub async fn get_app_user(&self, app_user_id: &str) -> Result<Option<AppUser>, AppError> {
        match &self.backend {
            Backend::Firestore(fs) => fs.get_app_user(app_user_id).await,
            Backend::Memory(mem) => Ok(mem.get_app_user(app_user_id)),
        }
    }

    pub async fn find_app_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AppUser>, AppError> {
        match &self.backend {
            Backend::Firestore(fs) => fs.find_app_user_by_username(username).await,
            Backend::Memory(mem) => Ok(mem.find_app_user_by_username(username)),
        }
    }

    /// The admin account owning the shared influencer graph.
    ///
    /// With several admins, the oldest one wins.
    pub async fn find_admin(&self) -> Result<Option<AppUser>, AppError> {
        let admins = match &self.backend {
            Backend::Firestore(fs) => fs.list_admins().await?,
            Backend::Memory(mem) => mem.list_admins(),
        };
        Ok(admins.into_iter().min_by_key(|a| a.created_at))
    }

    pub async fn save_app_user(&self, app_user: &AppUser) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(fs) => fs.save_app_user(app_user).await,
            Backend::Memory(mem) => {
                mem.save_app_user(app_user);
                Ok(())
            }
        }
    }
}
