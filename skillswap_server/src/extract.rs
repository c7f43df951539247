use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use skillswap_core::{GraphError, UserId};

use crate::{error::AppError, state::State};

/// The verified caller. Rejects with 401 when the bearer token is missing,
/// malformed, expired, or names an account that no longer exists.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<Arc<State>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<State>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| GraphError::Unauthorized("Unauthorized".into()))?;

        let user = state.accounts.authenticate(token).await?;
        Ok(AuthUser {
            id: user.id,
            email: user.email,
        })
    }
}
