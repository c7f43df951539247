//! A `ProfileRepository` that delegates to `MemoryStore` but can be told to
//! fail every write to one profile, so tests can break an approval halfway.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use skillswap_core::store::ProfileRepository;
use skillswap_core::{MemoryStore, Profile, ProfileId, StoreError, UserId};

#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    fail_writes_to: Arc<Mutex<Option<ProfileId>>>,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_writes_to: Arc::default(),
        }
    }

    pub fn fail_writes_to(&self, id: Option<ProfileId>) {
        *self.fail_writes_to.lock().unwrap() = id;
    }
}

#[async_trait]
impl ProfileRepository for FlakyStore {
    async fn get(&self, id: ProfileId) -> Result<Option<Profile>, StoreError> {
        self.inner.get(id).await
    }

    async fn get_by_owner(&self, owner: UserId) -> Result<Option<Profile>, StoreError> {
        self.inner.get_by_owner(owner).await
    }

    async fn list(&self) -> Result<Vec<Profile>, StoreError> {
        self.inner.list().await
    }

    async fn insert(&self, profile: &Profile) -> Result<bool, StoreError> {
        self.inner.insert(profile).await
    }

    async fn compare_and_swap(
        &self,
        profile: &Profile,
        expected_version: u64,
    ) -> Result<bool, StoreError> {
        let failing = *self.fail_writes_to.lock().unwrap();
        if failing == Some(profile.id) {
            return Err(StoreError::Other("store unavailable".into()));
        }
        self.inner.compare_and_swap(profile, expected_version).await
    }
}
