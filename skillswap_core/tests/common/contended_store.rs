//! A `ProfileRepository` whose compare-and-set never wins, as if another
//! writer always got there first.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use skillswap_core::store::ProfileRepository;
use skillswap_core::{MemoryStore, Profile, ProfileId, StoreError, UserId};

#[derive(Clone, Default)]
pub struct ContendedStore {
    pub inner: MemoryStore,
    attempts: Arc<AtomicUsize>,
}

impl ContendedStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            attempts: Arc::default(),
        }
    }

    /// Number of compare-and-set calls seen so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileRepository for ContendedStore {
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
        _profile: &Profile,
        _expected_version: u64,
    ) -> Result<bool, StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Ok(false)
    }
}
