use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Identifier of a stored profile document, distinct from its owner's [`UserId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(Uuid);

impl ProfileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ProfileId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(format!("Unknown visibility '{other}'")),
        }
    }
}

/// A user's public-facing record, one per owner.
///
/// Stored as a single JSON document:
/// `{ "id":"…", "owner":"…", "name":"Ada", "skillsOffered":["Guitar"], "incomingRequests":[], … }`
///
/// `incoming_requests` and `connections` are only ever touched by the graph manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub owner: UserId,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default, rename = "profileVisibility")]
    pub visibility: Visibility,
    #[serde(default, rename = "profilePhotoUrl")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub skills_offered: Vec<String>,
    #[serde(default)]
    pub skills_wanted: Vec<String>,
    #[serde(default)]
    pub incoming_requests: Vec<UserId>,
    #[serde(default)]
    pub connections: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Revision counter for compare-and-set writes.
    #[serde(default)]
    pub version: u64,
}

impl Profile {
    pub fn new(owner: UserId, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::new(),
            owner,
            name,
            location: None,
            availability: None,
            visibility: Visibility::default(),
            photo_url: None,
            skills_offered: Vec::new(),
            skills_wanted: Vec::new(),
            incoming_requests: Vec::new(),
            connections: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn has_request_from(&self, user: &UserId) -> bool {
        self.incoming_requests.contains(user)
    }

    pub fn is_connected_to(&self, user: &UserId) -> bool {
        self.connections.contains(user)
    }

    /// Merge the supplied fields. Returns `true` if anything changed.
    ///
    /// Does not validate; the graph manager rejects blank names before calling this.
    pub fn apply(&mut self, update: &ProfileUpdate) -> bool {
        let mut changed = false;
        if let Some(name) = &update.name {
            changed |= replace(&mut self.name, name.trim().to_string());
        }
        if let Some(location) = &update.location {
            changed |= replace(&mut self.location, Some(location.clone()));
        }
        if let Some(availability) = &update.availability {
            changed |= replace(&mut self.availability, Some(availability.clone()));
        }
        if let Some(visibility) = update.visibility {
            changed |= replace(&mut self.visibility, visibility);
        }
        if let Some(skills) = &update.skills_offered {
            changed |= replace(&mut self.skills_offered, skills.clone());
        }
        if let Some(skills) = &update.skills_wanted {
            changed |= replace(&mut self.skills_wanted, skills.clone());
        }
        changed
    }

    pub fn summary(&self) -> RequesterSummary {
        RequesterSummary {
            user: self.owner,
            name: Some(self.name.clone()),
            photo_url: self.photo_url.clone(),
            skills_offered: self.skills_offered.clone(),
            skills_wanted: self.skills_wanted.clone(),
            location: self.location.clone(),
        }
    }

    /// Listing projection; `requested_by_me` is derived per viewer and never stored.
    pub fn public_view(&self, viewer: &UserId) -> PublicProfile {
        PublicProfile {
            id: self.id,
            owner: self.owner,
            name: self.name.clone(),
            location: self.location.clone(),
            availability: self.availability.clone(),
            photo_url: self.photo_url.clone(),
            skills_offered: self.skills_offered.clone(),
            skills_wanted: self.skills_wanted.clone(),
            requested_by_me: self.has_request_from(viewer),
            connected: self.is_connected_to(viewer),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Partial update for `upsert_profile`. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub availability: Option<String>,
    #[serde(rename = "profileVisibility")]
    pub visibility: Option<Visibility>,
    pub skills_offered: Option<Vec<String>>,
    pub skills_wanted: Option<Vec<String>>,
}

impl ProfileUpdate {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_skills(mut self, offered: &[&str], wanted: &[&str]) -> Self {
        self.skills_offered = Some(offered.iter().map(|s| s.to_string()).collect());
        self.skills_wanted = Some(wanted.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// Parse a skills payload sent as a JSON array of strings.
///
/// A missing or empty payload is an empty list.
pub fn parse_skills(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
}

/// Who asked to connect, as shown to the profile owner.
///
/// `name` is `None` when the requester never created a profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequesterSummary {
    pub user: UserId,
    pub name: Option<String>,
    #[serde(rename = "profilePhotoUrl")]
    pub photo_url: Option<String>,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
    pub location: Option<String>,
}

impl RequesterSummary {
    pub fn anonymous(user: UserId) -> Self {
        Self {
            user,
            name: None,
            photo_url: None,
            skills_offered: Vec::new(),
            skills_wanted: Vec::new(),
            location: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: ProfileId,
    pub owner: UserId,
    pub name: String,
    pub location: Option<String>,
    pub availability: Option<String>,
    #[serde(rename = "profilePhotoUrl")]
    pub photo_url: Option<String>,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
    pub requested_by_me: bool,
    pub connected: bool,
}
