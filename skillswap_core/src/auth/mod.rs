//! Identity provider: accounts, password hashing and bearer tokens.

pub mod accounts;
pub mod password;
pub mod token;

use std::time::Duration;

pub use accounts::{AccountService, LoginResponse, PublicUser, User};
pub use token::{Claims, TokenIssuer};

/// Immutable auth settings, built once at startup and injected.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl: Duration) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}
