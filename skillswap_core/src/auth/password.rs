use bcrypt::{hash, verify};

use crate::errors::GraphError;

/// Hash on the blocking pool; bcrypt is deliberately slow.
pub async fn hash_password_with_cost(password: String, cost: u32) -> Result<String, GraphError> {
    tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .map_err(|e| GraphError::Internal(e.to_string()))?
        .map_err(|e| GraphError::Internal(format!("Failed to hash password: {e}")))
}

/// `Ok(false)` for a wrong password; `Err` only if the stored hash is unreadable.
pub async fn verify_password(password: String, password_hash: String) -> Result<bool, GraphError> {
    tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .map_err(|e| GraphError::Internal(e.to_string()))?
        .map_err(|e| GraphError::Internal(format!("Failed to verify password: {e}")))
}
