use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info, warn};

use super::{Decision, RequestOutcome, ResolveOutcome};
use crate::blob::{BlobStore, PhotoUpload};
use crate::errors::GraphError;
use crate::profile::{Profile, ProfileId, ProfileUpdate, PublicProfile, RequesterSummary, UserId};
use crate::store::ProfileRepository;

/// Upper bound on compare-and-set retries for one profile write.
const MAX_UPDATE_ATTEMPTS: usize = 64;

/// Owns the profile documents and the request/approval graph between their owners.
///
/// Every write to an existing profile is a read-modify-write retried on top of
/// [`ProfileRepository::compare_and_swap`], so concurrent requests aimed at the
/// same profile never overwrite each other.
///
/// Approval touches two profiles with two separate writes (owner half, then
/// requester half). A failure between them leaves a one-way connection;
/// [`ConnectionGraphManager::reconcile_connections`] replays the missing half.
///
/// Cloning only bumps two reference counts.
#[derive(Clone)]
pub struct ConnectionGraphManager {
    profiles: Arc<dyn ProfileRepository>,
    blobs: Arc<dyn BlobStore>,
}

#[derive(Clone, Copy)]
enum RequestStatus {
    Sent,
    AlreadyRequested,
    AlreadyConnected,
}

impl ConnectionGraphManager {
    pub fn new(profiles: Arc<dyn ProfileRepository>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { profiles, blobs }
    }

    /// Create the caller's profile, or merge `update` into the existing one.
    ///
    /// - `name` is mandatory on creation and may never become blank.
    /// - A photo is validated and stored before the profile is written; its URL
    ///   replaces `photo_url`. If the write then fails the stored photo is deleted.
    /// - Unchanged input is a no-op: the stored document (timestamps and version
    ///   included) stays identical.
    pub async fn upsert_profile(
        &self,
        owner: UserId,
        update: ProfileUpdate,
        photo: Option<PhotoUpload>,
    ) -> Result<Profile, GraphError> {
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(GraphError::validation("Name is required"));
        }

        let existing = self.profiles.get_by_owner(owner).await?;
        if existing.is_none() && update.name.is_none() {
            return Err(GraphError::validation("Name is required"));
        }

        let photo_url = match photo {
            Some(upload) => Some(self.store_photo(upload).await?),
            None => None,
        };

        let written = self.write_profile(owner, existing, &update, photo_url.as_deref()).await;
        if written.is_err() {
            if let Some(url) = &photo_url {
                if let Err(e) = self.blobs.delete(url).await {
                    warn!("Could not remove orphaned photo {}: {}", url, e);
                }
            }
        }
        written
    }

    async fn write_profile(
        &self,
        owner: UserId,
        existing: Option<Profile>,
        update: &ProfileUpdate,
        photo_url: Option<&str>,
    ) -> Result<Profile, GraphError> {
        if existing.is_none() {
            let name = update.name.as_deref().unwrap_or_default().trim().to_string();
            let mut profile = Profile::new(owner, name);
            profile.apply(update);
            profile.photo_url = photo_url.map(str::to_string);

            if self.profiles.insert(&profile).await? {
                info!("Created profile {} for user {}", profile.id, owner);
                return Ok(profile);
            }
            debug!("Profile for {} created concurrently, merging instead", owner);
        }

        let current = self
            .profiles
            .get_by_owner(owner)
            .await?
            .ok_or_else(|| GraphError::Internal(format!("profile for {owner} disappeared")))?;

        let profile = self
            .update_profile(current.id, |p| {
                let mut changed = p.apply(update);
                if let Some(url) = photo_url {
                    if p.photo_url.as_deref() != Some(url) {
                        p.photo_url = Some(url.to_string());
                        changed = true;
                    }
                }
                Ok(changed)
            })
            .await?;
        debug!("Upserted profile {} (v{})", profile.id, profile.version);
        Ok(profile)
    }

    /// The caller's own profile.
    pub async fn get_profile(&self, owner: UserId) -> Result<Profile, GraphError> {
        self.profiles
            .get_by_owner(owner)
            .await?
            .ok_or_else(|| GraphError::not_found("Profile not found"))
    }

    /// Every public profile except the requester's, with `requested_by_me` filled in.
    pub async fn list_public_profiles(
        &self,
        requester: UserId,
    ) -> Result<Vec<PublicProfile>, GraphError> {
        let profiles = self.profiles.list().await?;
        Ok(profiles
            .iter()
            .filter(|p| p.is_public() && p.owner != requester)
            .map(|p| p.public_view(&requester))
            .collect())
    }

    /// Ask the owner of `target` to connect.
    ///
    /// Checked in order: target exists, target is not the requester's own
    /// profile, no pending request or existing connection. Only then is the
    /// requester appended to the target's incoming requests.
    pub async fn request_connection(
        &self,
        requester: UserId,
        target: ProfileId,
    ) -> Result<RequestOutcome, GraphError> {
        let profile = self
            .profiles
            .get(target)
            .await?
            .ok_or_else(|| GraphError::not_found("User not found"))?;

        if profile.owner == requester {
            return Err(GraphError::InvalidOperation(
                "Cannot request yourself".into(),
            ));
        }

        let mut status = RequestStatus::Sent;
        let updated = self
            .update_profile(target, |p| {
                if p.has_request_from(&requester) {
                    status = RequestStatus::AlreadyRequested;
                    return Ok(false);
                }
                if p.is_connected_to(&requester) {
                    status = RequestStatus::AlreadyConnected;
                    return Ok(false);
                }
                p.incoming_requests.push(requester);
                status = RequestStatus::Sent;
                Ok(true)
            })
            .await?;

        let request_count = updated.incoming_requests.len();
        let outcome = match status {
            RequestStatus::Sent => {
                info!("{} requested a connection with {}", requester, updated.owner);
                RequestOutcome::Sent {
                    profile_id: updated.id,
                    request_count,
                }
            }
            RequestStatus::AlreadyRequested => RequestOutcome::AlreadyRequested {
                profile_id: updated.id,
                request_count,
            },
            RequestStatus::AlreadyConnected => RequestOutcome::AlreadyConnected {
                profile_id: updated.id,
            },
        };
        Ok(outcome)
    }

    /// Pending requests on the caller's profile, oldest first.
    pub async fn get_incoming_requests(
        &self,
        owner: UserId,
    ) -> Result<Vec<RequesterSummary>, GraphError> {
        let profile = self.get_profile(owner).await?;

        let mut summaries = Vec::with_capacity(profile.incoming_requests.len());
        for requester in &profile.incoming_requests {
            let summary = match self.profiles.get_by_owner(*requester).await? {
                Some(p) => p.summary(),
                None => RequesterSummary::anonymous(*requester),
            };
            summaries.push(summary);
        }
        Ok(summaries)
    }

    /// Approve or reject a pending request from `requester`.
    ///
    /// Approving requires the requester to have a profile; otherwise nothing is
    /// written and the request stays pending.
    pub async fn resolve_request(
        &self,
        owner: UserId,
        requester: UserId,
        decision: Decision,
    ) -> Result<ResolveOutcome, GraphError> {
        let profile = self.get_profile(owner).await?;
        if !profile.has_request_from(&requester) {
            return Err(GraphError::not_found("Request not found"));
        }

        match decision {
            Decision::Reject => {
                self.update_profile(profile.id, |p| {
                    take_request(p, &requester)?;
                    Ok(true)
                })
                .await?;
                info!("{} rejected the request from {}", owner, requester);
            }
            Decision::Approve => {
                let peer = self.profiles.get_by_owner(requester).await?.ok_or_else(|| {
                    GraphError::not_found("Requester has no profile yet")
                })?;

                // Owner half: consume the request and connect, in one write.
                self.update_profile(profile.id, |p| {
                    take_request(p, &requester)?;
                    if !p.is_connected_to(&requester) {
                        p.connections.push(requester);
                    }
                    Ok(true)
                })
                .await?;

                // Requester half: separate write, safe to replay.
                if let Err(e) = self.link(peer.id, owner).await {
                    error!(
                        "{} approved {} but the reverse connection failed: {}",
                        owner, requester, e
                    );
                    return Err(e);
                }
                info!("{} and {} are now connected", owner, requester);
            }
        }

        Ok(ResolveOutcome {
            requester,
            decision,
        })
    }

    /// Re-apply the requester half of every approval on `owner`'s side.
    ///
    /// Returns the peers that were missing the reverse connection.
    pub async fn reconcile_connections(&self, owner: UserId) -> Result<Vec<UserId>, GraphError> {
        let profile = self.get_profile(owner).await?;

        let mut repaired = Vec::new();
        for peer in &profile.connections {
            match self.profiles.get_by_owner(*peer).await? {
                Some(p) if !p.is_connected_to(&owner) => {
                    self.link(p.id, owner).await?;
                    repaired.push(*peer);
                }
                Some(_) => {}
                None => warn!("{} is connected to {} which has no profile", owner, peer),
            }
        }

        if !repaired.is_empty() {
            info!("Repaired {} reverse connection(s) for {}", repaired.len(), owner);
        }
        Ok(repaired)
    }

    /// Add `peer` to the connections of profile `id`, dropping any pending
    /// request from `peer` there. Idempotent.
    async fn link(&self, id: ProfileId, peer: UserId) -> Result<Profile, GraphError> {
        self.update_profile(id, |p| {
            let mut changed = false;
            if !p.is_connected_to(&peer) {
                p.connections.push(peer);
                changed = true;
            }
            let before = p.incoming_requests.len();
            p.incoming_requests.retain(|u| *u != peer);
            Ok(changed || p.incoming_requests.len() != before)
        })
        .await
    }

    async fn store_photo(&self, upload: PhotoUpload) -> Result<String, GraphError> {
        upload
            .extension()
            .map_err(|e| GraphError::validation(e.to_string()))?;
        let url = self.blobs.put(upload).await?;
        debug!("Stored photo at {}", url);
        Ok(url)
    }

    /// Read-modify-write on one profile, retried until the compare-and-set lands.
    ///
    /// `mutate` returns `Ok(false)` when it left the profile untouched; nothing is
    /// written then and the current document is returned as is.
    async fn update_profile<F>(&self, id: ProfileId, mut mutate: F) -> Result<Profile, GraphError>
    where
        F: FnMut(&mut Profile) -> Result<bool, GraphError>,
    {
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let mut profile = self
                .profiles
                .get(id)
                .await?
                .ok_or_else(|| GraphError::not_found("Profile not found"))?;

            let expected = profile.version;
            if !mutate(&mut profile)? {
                return Ok(profile);
            }
            profile.updated_at = Utc::now();

            if self.profiles.compare_and_swap(&profile, expected).await? {
                profile.version = expected + 1;
                return Ok(profile);
            }
            debug!("Write conflict on profile {} (attempt {})", id, attempt);
            tokio::task::yield_now().await;
        }

        Err(GraphError::Internal(format!(
            "profile {id} kept changing; gave up after {MAX_UPDATE_ATTEMPTS} attempts"
        )))
    }
}

fn take_request(profile: &mut Profile, requester: &UserId) -> Result<(), GraphError> {
    if !profile.has_request_from(requester) {
        return Err(GraphError::not_found("Request not found"));
    }
    profile.incoming_requests.retain(|u| u != requester);
    Ok(())
}
