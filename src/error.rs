//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and a JSON body of the form
//! `{"error": "<message>"}`.

use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::AuthRejection;

/// JSON error response body.
///
/// ```json
/// { "error": "token expired" }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Variant              | HTTP Status               |
/// |----------------------|---------------------------|
/// | `InvalidRequest`     | 400 Bad Request           |
/// | `UsernameTaken`      | 400 Bad Request           |
/// | `Unauthorized`       | 401 Unauthorized          |
/// | `InvalidCredentials` | 401 Unauthorized          |
/// | `RateLimited`        | 429 Too Many Requests     |
/// | `PersistenceError`   | 500 Internal Server Error |
/// | `Internal`           | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed. The message is returned verbatim.
    #[error("{0}")]
    InvalidRequest(String),

    /// Registration with a username that is already in use.
    #[error("Username already exists")]
    UsernameTaken,

    /// Bearer credential missing or refused by the auth gate.
    #[error("{0}")]
    Unauthorized(#[from] AuthRejection),

    /// Unknown username or wrong password at login.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Client exceeded rate limit.
    #[error("rate limit exceeded; retry after {retry_after_ms} ms")]
    RateLimited {
        /// Milliseconds until the client may retry.
        retry_after_ms: u64,
    },

    /// Internal server error. The message is returned verbatim.
    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::UsernameTaken => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Storage details stay in the logs.
        let message = match &self {
            Self::PersistenceError(detail) => {
                tracing::error!(%detail, "persistence failure");
                "Database error".to_string()
            }
            other => other.to_string(),
        };
        let mut response = axum::Json(ErrorResponse { error: message }).into_response();
        *response.status_mut() = status;
        if let Self::RateLimited { retry_after_ms } = self {
            let secs = retry_after_ms.div_ceil(1000).max(1);
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
