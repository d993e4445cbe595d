//! In-memory document store for local runs and tests.
//!
//! Listing returns documents in first-insertion order; replacing a document
//! keeps its original position.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{AppUser, User};

struct Stored<T> {
    seq: u64,
    doc: T,
}

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, Stored<User>>,
    app_users: DashMap<String, Stored<AppUser>>,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).map(|s| s.doc.clone())
    }

    pub fn list_users(&self) -> Vec<User> {
        ordered(&self.users, |_| true)
    }

    pub fn save_user(&self, user: &User) {
        self.upsert(&self.users, &user.id, user);
    }

    pub fn delete_user(&self, user_id: &str) {
        self.users.remove(user_id);
    }

    pub fn get_app_user(&self, app_user_id: &str) -> Option<AppUser> {
        self.app_users.get(app_user_id).map(|s| s.doc.clone())
    }

    pub fn find_app_user_by_username(&self, username: &str) -> Option<AppUser> {
        ordered(&self.app_users, |u| u.username == username)
            .into_iter()
            .next()
    }

    pub fn list_admins(&self) -> Vec<AppUser> {
        ordered(&self.app_users, AppUser::is_admin)
    }

    pub fn save_app_user(&self, app_user: &AppUser) {
        self.upsert(&self.app_users, &app_user.id, app_user);
    }

    fn upsert<T: Clone>(&self, map: &DashMap<String, Stored<T>>, id: &str, doc: &T) {
        match map.entry(id.to_string()) {
            Entry::Occupied(mut e) => e.get_mut().doc = doc.clone(),
            Entry::Vacant(e) => {
                let seq = self.seq.fetch_add(1, Ordering::Relaxed);
                e.insert(Stored {
                    seq,
                    doc: doc.clone(),
                });
            }
        }
    }
}

fn ordered<T: Clone>(map: &DashMap<String, Stored<T>>, keep: impl Fn(&T) -> bool) -> Vec<T> {
    let mut docs: Vec<(u64, T)> = map
        .iter()
        .filter(|s| keep(&s.doc))
        .map(|s| (s.seq, s.doc.clone()))
        .collect();
    docs.sort_by_key(|(seq, _)| *seq);
    docs.into_iter().map(|(_, doc)| doc).collect()
}
