pub mod manager;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::profile::{ProfileId, UserId};

/// What happened to a connection request.
///
/// Asking twice is not an error: the second call reports `AlreadyRequested`
/// and leaves the target untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Sent {
        profile_id: ProfileId,
        request_count: usize,
    },
    AlreadyRequested {
        profile_id: ProfileId,
        request_count: usize,
    },
    AlreadyConnected {
        profile_id: ProfileId,
    },
}

impl RequestOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, RequestOutcome::Sent { .. })
    }

    pub fn profile_id(&self) -> ProfileId {
        match self {
            RequestOutcome::Sent { profile_id, .. }
            | RequestOutcome::AlreadyRequested { profile_id, .. }
            | RequestOutcome::AlreadyConnected { profile_id } => *profile_id,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RequestOutcome::Sent { .. } => "Request sent",
            RequestOutcome::AlreadyRequested { .. } => "Already requested",
            RequestOutcome::AlreadyConnected { .. } => "Already connected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Decision::Approve),
            "reject" => Ok(Decision::Reject),
            other => Err(format!("Unknown action '{other}'")),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Approve => write!(f, "approved"),
            Decision::Reject => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOutcome {
    pub requester: UserId,
    pub decision: Decision,
}

impl ResolveOutcome {
    pub fn message(&self) -> String {
        format!("Request {}", self.decision)
    }
}
