//! Password hashing.
//!
//! Hashing and verification are CPU-bound (Argon2 via `password-auth`), so
//! both run on Tokio's blocking pool instead of an async worker.

use crate::error::GatewayError;

/// Hashes `password` into a PHC string.
///
/// # Errors
///
/// Returns [`GatewayError::Internal`] if the blocking task fails.
pub async fn hash_password(password: String) -> Result<String, GatewayError> {
    tokio::task::spawn_blocking(move || password_auth::generate_hash(password))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing task failed");
            GatewayError::Internal("Error processing password".to_string())
        })
}

/// Returns `true` if `password` matches the stored `hash`.
///
/// # Errors
///
/// Returns [`GatewayError::Internal`] if the blocking task fails.
pub async fn verify_password(password: String, hash: String) -> Result<bool, GatewayError> {
    tokio::task::spawn_blocking(move || password_auth::verify_password(password, &hash).is_ok())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password verification task failed");
            GatewayError::Internal("Error processing password".to_string())
        })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let Ok(hash) = hash_password("hunter2".to_string()).await else {
            panic!("hashing failed");
        };
        assert_ne!(hash, "hunter2");
        assert!(matches!(verify_password("hunter2".to_string(), hash.clone()).await, Ok(true)));
        assert!(matches!(verify_password("hunter3".to_string(), hash).await, Ok(false)));
    }

    #[tokio::test]
    async fn garbage_hash_does_not_verify() {
        let result = verify_password("pw".to_string(), "not-a-phc-string".to_string()).await;
        assert!(matches!(result, Ok(false)));
    }
}
