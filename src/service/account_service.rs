//! Account service: registration and login.

use std::sync::Arc;

use crate::auth::JwtAuthGate;
use crate::auth::password::{hash_password, verify_password};
use crate::error::GatewayError;
use crate::persistence::{NewUser, Storage};

/// Creates accounts and exchanges credentials for bearer tokens.
#[derive(Debug, Clone)]
pub struct AccountService {
    storage: Arc<Storage>,
    tokens: Arc<JwtAuthGate>,
}

impl AccountService {
    /// Creates a new `AccountService`.
    #[must_use]
    pub fn new(storage: Arc<Storage>, tokens: Arc<JwtAuthGate>) -> Self {
        Self { storage, tokens }
    }

    /// Registers `username` and returns a token for the new account.
    ///
    /// # Errors
    ///
    /// [`GatewayError::InvalidRequest`] if either field is empty after
    /// trimming the username, [`GatewayError::UsernameTaken`] if the name is
    /// in use, or a storage/internal error.
    pub async fn register(&self, username: &str, password: String) -> Result<String, GatewayError> {
        let username = validate(username, &password)?;

        if self.storage.find_user_by_username(username).await?.is_some() {
            return Err(GatewayError::UsernameTaken);
        }

        let password_hash = hash_password(password).await?;
        let user = self
            .storage
            .create_user(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        self.tokens.issue(user.id)
    }

    /// Verifies credentials and returns a fresh token.
    ///
    /// # Errors
    ///
    /// [`GatewayError::InvalidRequest`] for empty fields,
    /// [`GatewayError::InvalidCredentials`] for an unknown user or a wrong
    /// password, or a storage/internal error.
    pub async fn login(&self, username: &str, password: String) -> Result<String, GatewayError> {
        let username = validate(username, &password)?;

        let Some(user) = self.storage.find_user_by_username(username).await? else {
            tracing::warn!(%username, "login for unknown user");
            return Err(GatewayError::InvalidCredentials);
        };

        if !verify_password(password, user.password_hash.clone()).await? {
            tracing::warn!(%username, "login with wrong password");
            return Err(GatewayError::InvalidCredentials);
        }

        self.tokens.issue(user.id)
    }
}

fn validate<'a>(username: &'a str, password: &str) -> Result<&'a str, GatewayError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "Username and password are required".to_string(),
        ));
    }
    Ok(username)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::auth::{AuthGate, Identity};

    fn make_service() -> (AccountService, Arc<Storage>, Arc<JwtAuthGate>) {
        let storage = Arc::new(Storage::in_memory());
        let tokens = Arc::new(JwtAuthGate::new("secret", "murmur-gateway", Duration::hours(1)));
        (
            AccountService::new(Arc::clone(&storage), Arc::clone(&tokens)),
            storage,
            tokens,
        )
    }

    #[tokio::test]
    async fn register_returns_token_for_new_user() {
        let (service, storage, tokens) = make_service();
        let Ok(token) = service.register("  ada  ", "pw".to_string()).await else {
            panic!("registration failed");
        };
        let Ok(Some(user)) = storage.find_user_by_username("ada").await else {
            panic!("user not stored under trimmed name");
        };
        assert_eq!(tokens.authenticate(&token), Ok(Identity { user_id: user.id }));
        assert_ne!(user.password_hash, "pw");
    }

    #[tokio::test]
    async fn register_rejects_blank_fields() {
        let (service, _, _) = make_service();
        assert!(matches!(
            service.register("   ", "pw".to_string()).await,
            Err(GatewayError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.register("ada", String::new()).await,
            Err(GatewayError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn register_rejects_duplicate() {
        let (service, _, _) = make_service();
        assert!(service.register("ada", "pw".to_string()).await.is_ok());
        assert!(matches!(
            service.register("ada", "other".to_string()).await,
            Err(GatewayError::UsernameTaken)
        ));
    }

    #[tokio::test]
    async fn login_checks_password() {
        let (service, _, _) = make_service();
        assert!(service.register("ada", "pw".to_string()).await.is_ok());

        assert!(service.login("ada", "pw".to_string()).await.is_ok());
        assert!(matches!(
            service.login("ada", "nope".to_string()).await,
            Err(GatewayError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login("nobody", "pw".to_string()).await,
            Err(GatewayError::InvalidCredentials)
        ));
    }
}
