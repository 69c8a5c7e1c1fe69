//! Axum extractor that admits only requests with a valid bearer token.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::{Identity, bearer_token};
use crate::app_state::AppState;
use crate::error::GatewayError;

/// Identity of the caller, resolved through the configured
/// [`super::AuthGate`].
///
/// Rejects with [`GatewayError::Unauthorized`] (HTTP 401) before the
/// handler runs, so a refused WebSocket handshake is never upgraded.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub Identity);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = GatewayError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = bearer_token(&parts.headers)
            .and_then(|token| state.auth.authenticate(token))
            .inspect_err(|reason| {
                tracing::debug!(%reason, path = %parts.uri.path(), "credential rejected");
            })?;
        Ok(Self(identity))
    }
}
