//! Post handlers: create and list.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use super::json_body;
use crate::api::dto::CreatePostRequest;
use crate::app_state::AppState;
use crate::auth::Authenticated;
use crate::domain::Post;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /posts` — Create a post and push it to every live connection.
///
/// # Errors
///
/// Returns [`GatewayError`] on missing auth, empty content, or storage
/// failure.
#[utoipa::path(
    post,
    path = "/posts",
    tag = "Posts",
    summary = "Create a post",
    description = "Stores the post, then broadcasts it to all connected WebSocket clients.",
    request_body = CreatePostRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Post created", body = Post),
        (status = 400, description = "Empty content", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let req = json_body(payload)?;
    let post = state.post_service.create_post(identity, &req.content).await?;
    Ok(Json(post))
}

/// `GET /posts` — List all posts, newest first.
///
/// # Errors
///
/// Returns [`GatewayError`] on missing auth or storage failure.
#[utoipa::path(
    get,
    path = "/posts",
    tag = "Posts",
    summary = "List posts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All posts, newest first", body = Vec<Post>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Authenticated(_identity): Authenticated,
) -> Result<impl IntoResponse, GatewayError> {
    let posts = state.post_service.list_posts().await?;
    Ok(Json(posts))
}

/// Post routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/posts", post(create_post).get(list_posts))
}
