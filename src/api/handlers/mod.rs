//! REST endpoint handlers organized by resource.

pub mod account;
pub mod post;
pub mod system;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;

use crate::app_state::AppState;
use crate::error::GatewayError;

/// Composes all rate-limited resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(account::routes())
        .merge(post::routes())
}

/// Unwraps a JSON body, turning any extractor rejection into a uniform
/// `400 {"error": "Invalid request"}`.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, GatewayError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::warn!(error = %rejection, "invalid request body");
            Err(GatewayError::InvalidRequest("Invalid request".to_string()))
        }
    }
}
