//! Bearer-token authentication.
//!
//! [`AuthGate`] is the contract the handshake and the REST handlers rely
//! on: given the raw credential from an `Authorization: Bearer <token>`
//! header it resolves an [`Identity`] or an [`AuthRejection`]. The
//! production gate is [`JwtAuthGate`].

pub mod extractor;
pub mod jwt;
pub mod password;

use std::fmt;

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

use crate::domain::UserId;

pub use extractor::Authenticated;
pub use jwt::JwtAuthGate;

/// Caller identity resolved from a valid credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// Authenticated user.
    pub user_id: UserId,
}

/// Why a credential was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthRejection {
    /// No `Authorization` header was sent.
    #[error("missing authorization header")]
    Missing,
    /// Wrong scheme, unreadable header, or a token that cannot be decoded.
    #[error("malformed token")]
    Malformed,
    /// The token was valid but its lifetime has passed.
    #[error("token expired")]
    Expired,
    /// The token signature does not match.
    #[error("invalid token signature")]
    InvalidSignature,
}

/// Validates bearer credentials.
pub trait AuthGate: Send + Sync + fmt::Debug {
    /// Resolves `credential` (the token without the `Bearer ` prefix).
    ///
    /// # Errors
    ///
    /// Returns the [`AuthRejection`] describing why the credential is not
    /// acceptable.
    fn authenticate(&self, credential: &str) -> Result<Identity, AuthRejection>;
}

/// Extracts the bearer token from the `Authorization` header.
///
/// The scheme is matched case-insensitively.
///
/// # Errors
///
/// [`AuthRejection::Missing`] if the header is absent,
/// [`AuthRejection::Malformed`] if it is not `Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthRejection::Missing)?;
    let value = value.to_str().map_err(|_| AuthRejection::Malformed)?;
    let (scheme, token) = value.trim().split_once(' ').ok_or(AuthRejection::Malformed)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthRejection::Malformed);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthRejection::Malformed);
    }
    Ok(token)
}
