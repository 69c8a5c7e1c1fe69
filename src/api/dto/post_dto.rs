//! Post DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for `POST /posts`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    /// Post body. Trimmed and HTML-escaped before storage.
    #[serde(default)]
    pub content: String,
}
