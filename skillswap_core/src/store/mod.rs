//! Repository seams between the domain and whatever document store backs it.
//!
//! Writes to an existing profile go through [`ProfileRepository::compare_and_swap`]:
//! the caller reads a profile, mutates it, and hands it back together with the
//! `version` it read. The store accepts the write only if nobody else wrote in
//! between, which gives per-profile atomicity without holding a lock across
//! the caller's logic.

pub mod memory;

use async_trait::async_trait;

use crate::auth::User;
use crate::errors::StoreError;
use crate::profile::{Profile, ProfileId, UserId};

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get(&self, id: ProfileId) -> Result<Option<Profile>, StoreError>;

    async fn get_by_owner(&self, owner: UserId) -> Result<Option<Profile>, StoreError>;

    /// Every stored profile, oldest first.
    async fn list(&self) -> Result<Vec<Profile>, StoreError>;

    /// Insert a brand-new profile. `Ok(false)` if the owner already has one.
    async fn insert(&self, profile: &Profile) -> Result<bool, StoreError>;

    /// Replace the stored profile if its version still equals `expected_version`.
    ///
    /// On success the stored copy carries `expected_version + 1`.
    /// `Ok(false)` means a concurrent writer got there first (or the profile vanished).
    async fn compare_and_swap(
        &self,
        profile: &Profile,
        expected_version: u64,
    ) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// `Ok(false)` if the email is already registered.
    async fn insert_user(&self, user: &User) -> Result<bool, StoreError>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}
