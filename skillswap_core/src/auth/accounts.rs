use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::password::{hash_password_with_cost, verify_password};
use super::token::TokenIssuer;
use super::AuthConfig;
use crate::errors::GraphError;
use crate::profile::UserId;
use crate::store::UserRepository;

/// Stored account. Never serialised to clients; see [`PublicUser`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

/// Registration, login and bearer-token authentication.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, config: &AuthConfig) -> Self {
        Self {
            users,
            tokens: TokenIssuer::new(config),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Lower the bcrypt cost; only sensible in tests.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<PublicUser, GraphError> {
        let email = normalize_email(email);
        if email.is_empty() || password.trim().is_empty() {
            return Err(GraphError::validation("Email & password required"));
        }

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(GraphError::Conflict("Email already in use".into()));
        }

        let user = User {
            id: UserId::new(),
            email,
            password_hash: hash_password_with_cost(password.to_string(), self.bcrypt_cost).await?,
            created_at: Utc::now(),
        };

        // A concurrent registration can still win between the lookup and here.
        if !self.users.insert_user(&user).await? {
            return Err(GraphError::Conflict("Email already in use".into()));
        }

        info!("Registered user {}", user.id);
        Ok(user.to_public())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, GraphError> {
        let email = normalize_email(email);
        if email.is_empty() || password.trim().is_empty() {
            return Err(GraphError::validation("Email & password required"));
        }

        let invalid = || GraphError::Unauthorized("Invalid credentials".into());
        let user = self
            .users
            .find_user_by_email(&email)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password.to_string(), user.password_hash.clone()).await? {
            debug!("Wrong password for {}", user.id);
            return Err(invalid());
        }

        Ok(LoginResponse {
            token: self.tokens.issue(user.id)?,
            expires_in: self.tokens.ttl_secs(),
        })
    }

    /// Resolve a bearer token to a live account.
    pub async fn authenticate(&self, token: &str) -> Result<User, GraphError> {
        let claims = self.tokens.verify(token)?;
        self.users
            .get_user(claims.sub)
            .await?
            .ok_or_else(|| GraphError::Unauthorized("Invalid or expired token".into()))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::store::memory::MemoryStore;

    fn service() -> AccountService {
        let config = AuthConfig::new("test-secret", Duration::from_secs(60));
        AccountService::new(Arc::new(MemoryStore::new()), &config).with_bcrypt_cost(4)
    }

    #[tokio::test]
    async fn register_login_authenticate() {
        let accounts = service();
        let user = accounts.register(" Ada@Example.com ", "pw").await.unwrap();
        assert_eq!(user.email, "ada@example.com");

        let login = accounts.login("ada@example.com", "pw").await.unwrap();
        assert_eq!(login.expires_in, 60);

        let authed = accounts.authenticate(&login.token).await.unwrap();
        assert_eq!(authed.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let accounts = service();
        accounts.register("ada@example.com", "pw").await.unwrap();
        let err = accounts.register("ADA@example.com", "pw2").await.unwrap_err();
        assert!(matches!(err, GraphError::Conflict(_)));
    }

    #[tokio::test]
    async fn missing_fields_and_bad_password() {
        let accounts = service();
        assert!(matches!(
            accounts.register("", "pw").await,
            Err(GraphError::ValidationFailed(_))
        ));

        accounts.register("ada@example.com", "pw").await.unwrap();
        assert!(matches!(
            accounts.login("ada@example.com", "nope").await,
            Err(GraphError::Unauthorized(_))
        ));
        assert!(matches!(
            accounts.login("bob@example.com", "pw").await,
            Err(GraphError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn whitespace_password_is_blank() {
        let accounts = service();
        assert!(matches!(
            accounts.register("ada@example.com", "   ").await,
            Err(GraphError::ValidationFailed(_))
        ));
        assert!(matches!(
            accounts.login("ada@example.com", " \t").await,
            Err(GraphError::ValidationFailed(_))
        ));
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        assert!(matches!(
            service().authenticate("not-a-jwt").await,
            Err(GraphError::Unauthorized(_))
        ));
    }
}
