use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use tokio::sync::Mutex;

use super::{ProfileRepository, UserRepository};
use crate::auth::User;
use crate::errors::StoreError;
use crate::profile::{Profile, ProfileId, UserId};

#[derive(Default)]
struct Documents {
    profiles: HashMap<ProfileId, Profile>,
    /// Insertion order, so `list` is stable.
    order: Vec<ProfileId>,
    users: HashMap<UserId, User>,
}

/// In-process document store.
///
/// Cloning is cheap: every clone shares the same `Arc<Mutex<_>>`, so the
/// server state, tests and the graph manager can all hold one.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Documents>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn get(&self, id: ProfileId) -> Result<Option<Profile>, StoreError> {
        let docs = self.inner.lock().await;
        Ok(docs.profiles.get(&id).cloned())
    }

    async fn get_by_owner(&self, owner: UserId) -> Result<Option<Profile>, StoreError> {
        let docs = self.inner.lock().await;
        Ok(docs.profiles.values().find(|p| p.owner == owner).cloned())
    }

    async fn list(&self) -> Result<Vec<Profile>, StoreError> {
        let docs = self.inner.lock().await;
        Ok(docs
            .order
            .iter()
            .filter_map(|id| docs.profiles.get(id).cloned())
            .collect())
    }

    async fn insert(&self, profile: &Profile) -> Result<bool, StoreError> {
        let mut docs = self.inner.lock().await;
        if docs.profiles.values().any(|p| p.owner == profile.owner) {
            return Ok(false);
        }
        docs.order.push(profile.id);
        docs.profiles.insert(profile.id, profile.clone());
        Ok(true)
    }

    async fn compare_and_swap(
        &self,
        profile: &Profile,
        expected_version: u64,
    ) -> Result<bool, StoreError> {
        let mut docs = self.inner.lock().await;
        match docs.profiles.get_mut(&profile.id) {
            Some(stored) if stored.version == expected_version => {
                *stored = Profile {
                    version: expected_version + 1,
                    ..profile.clone()
                };
                Ok(true)
            }
            Some(stored) => {
                debug!(
                    "CAS miss on profile {}: expected v{}, found v{}",
                    profile.id, expected_version, stored.version
                );
                Ok(false)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<bool, StoreError> {
        let mut docs = self.inner.lock().await;
        if docs.users.values().any(|u| u.email == user.email) {
            return Ok(false);
        }
        docs.users.insert(user.id, user.clone());
        Ok(true)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let docs = self.inner.lock().await;
        Ok(docs.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let docs = self.inner.lock().await;
        Ok(docs.users.values().find(|u| u.email == email).cloned())
    }
}
