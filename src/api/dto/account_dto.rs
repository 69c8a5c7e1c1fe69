//! Registration and login DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /register` and `POST /login`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    /// Username; surrounding whitespace is ignored.
    #[serde(default)]
    pub username: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

/// Response body carrying a bearer token.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Signed token for the `Authorization: Bearer` header.
    pub token: String,
}
