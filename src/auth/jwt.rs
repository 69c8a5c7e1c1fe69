//! HS256 JSON Web Tokens: issued on register/login, checked by the gate.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::{AuthGate, AuthRejection, Identity};
use crate::domain::UserId;
use crate::error::GatewayError;

/// Token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    user_id: UserId,
    iat: i64,
    exp: i64,
    iss: String,
}

/// Issues and validates HS256 tokens signed with a shared secret.
pub struct JwtAuthGate {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl: Duration,
}

impl JwtAuthGate {
    /// Creates a gate for `secret`. Tokens carry `issuer` and live for
    /// `ttl`; validation requires both a matching issuer and an unexpired
    /// `exp` with no leeway.
    #[must_use]
    pub fn new(secret: &str, issuer: impl Into<String>, ttl: Duration) -> Self {
        let issuer = issuer.into();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[issuer.as_str()]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer,
            ttl,
        }
    }

    /// Signs a token for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the expiry is not
    /// representable or signing fails.
    pub fn issue(&self, user_id: UserId) -> Result<String, GatewayError> {
        let now = Utc::now();
        let Some(expires_at) = now.checked_add_signed(self.ttl) else {
            tracing::error!(ttl = %self.ttl, "token expiry out of range");
            return Err(GatewayError::Internal("Error generating token".to_string()));
        };
        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!(error = %e, "failed to sign token");
            GatewayError::Internal("Error generating token".to_string())
        })
    }
}

impl AuthGate for JwtAuthGate {
    fn authenticate(&self, credential: &str) -> Result<Identity, AuthRejection> {
        match decode::<Claims>(credential, &self.decoding, &self.validation) {
            Ok(data) => Ok(Identity {
                user_id: data.claims.user_id,
            }),
            Err(e) => Err(match e.kind() {
                ErrorKind::ExpiredSignature => AuthRejection::Expired,
                ErrorKind::InvalidSignature => AuthRejection::InvalidSignature,
                _ => AuthRejection::Malformed,
            }),
        }
    }
}

impl fmt::Debug for JwtAuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtAuthGate")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
