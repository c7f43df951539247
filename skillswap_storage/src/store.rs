use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use directories::ProjectDirs;
use log::{debug, warn};
use serde::{de::DeserializeOwned, Serialize};
use skillswap_core::auth::User;
use skillswap_core::store::{ProfileRepository, UserRepository};
use skillswap_core::{Profile, ProfileId, StoreError, UserId};
use tokio::{fs, sync::Mutex};

const PROFILES: &str = "profiles";
const USERS: &str = "users";

/// One pretty-printed JSON file per document:
/// `<root>/profiles/<profile id>.json` and `<root>/users/<user id>.json`.
///
/// Writes are serialised through one async lock and land via temp file +
/// rename, so readers never see half a document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    /// `~/.local/share/skillswap` on Linux, `%APPDATA%\skillswap\data` on Windows, etc.
    pub fn new() -> io::Result<Self> {
        let proj = ProjectDirs::from("", "", "skillswap")
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "Unable to locate data dir"))?;
        Self::with_dir(proj.data_dir())
    }

    pub fn with_dir(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(root.join(PROFILES))?;
        std::fs::create_dir_all(root.join(USERS))?;
        Ok(Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_for(&self, kind: &str, id: impl std::fmt::Display) -> PathBuf {
        self.root.join(kind).join(format!("{id}.json"))
    }

    async fn users(&self) -> Result<Vec<User>, StoreError> {
        read_all(&self.root.join(USERS)).await
    }
}

#[async_trait]
impl ProfileRepository for JsonFileStore {
    async fn get(&self, id: ProfileId) -> Result<Option<Profile>, StoreError> {
        read_one(&self.file_for(PROFILES, id)).await
    }

    async fn get_by_owner(&self, owner: UserId) -> Result<Option<Profile>, StoreError> {
        Ok(self.list().await?.into_iter().find(|p| p.owner == owner))
    }

    async fn list(&self) -> Result<Vec<Profile>, StoreError> {
        let mut profiles: Vec<Profile> = read_all(&self.root.join(PROFILES)).await?;
        profiles.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(profiles)
    }

    async fn insert(&self, profile: &Profile) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        if self.get_by_owner(profile.owner).await?.is_some() {
            return Ok(false);
        }
        write_atomic(&self.file_for(PROFILES, profile.id), profile).await?;
        debug!("Inserted profile {}", profile.id);
        Ok(true)
    }

    async fn compare_and_swap(
        &self,
        profile: &Profile,
        expected_version: u64,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let path = self.file_for(PROFILES, profile.id);
        let Some(stored) = read_one::<Profile>(&path).await? else {
            return Ok(false);
        };
        if stored.version != expected_version {
            debug!(
                "CAS miss on profile {}: expected v{}, found v{}",
                profile.id, expected_version, stored.version
            );
            return Ok(false);
        }

        let next = Profile {
            version: expected_version + 1,
            ..profile.clone()
        };
        write_atomic(&path, &next).await?;
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for JsonFileStore {
    async fn insert_user(&self, user: &User) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        if self.users().await?.iter().any(|u| u.email == user.email) {
            return Ok(false);
        }
        write_atomic(&self.file_for(USERS, user.id), user).await?;
        Ok(true)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        read_one(&self.file_for(USERS, id)).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().await?.into_iter().find(|u| u.email == email))
    }
}

async fn read_one<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Every document in `dir` (silently skips malformed files).
async fn read_all<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, StoreError> {
    let mut out = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.extension().is_some_and(|e| e == "json") {
            continue;
        }
        match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(doc) => out.push(doc),
                Err(e) => warn!("Skipping malformed {:?}: {e}", path),
            },
            // Replaced between listing and reading.
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(out)
}

async fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(value)?).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
