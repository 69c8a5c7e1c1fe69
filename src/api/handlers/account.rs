//! Account handlers: register and login.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use super::json_body;
use crate::api::dto::{CredentialsRequest, TokenResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /register` — Create an account and return a token.
///
/// # Errors
///
/// Returns [`GatewayError`] on invalid input or a taken username.
#[utoipa::path(
    post,
    path = "/register",
    tag = "Accounts",
    summary = "Register a new user",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Account created", body = TokenResponse),
        (status = 400, description = "Invalid input or username taken", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let req = json_body(payload)?;
    let token = state
        .account_service
        .register(&req.username, req.password)
        .await?;
    Ok(Json(TokenResponse { token }))
}

/// `POST /login` — Exchange credentials for a token.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidCredentials`] on a failed login.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Accounts",
    summary = "Log in",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let req = json_body(payload)?;
    let token = state
        .account_service
        .login(&req.username, req.password)
        .await?;
    Ok(Json(TokenResponse { token }))
}

/// Account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}
