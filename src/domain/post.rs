//! Posts and the users who author them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{PostId, UserId};

/// A stored post, exactly as it is returned by the REST API and pushed to
/// live connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Post {
    /// Post identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: PostId,
    /// Author identifier.
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    /// Author username at the time of posting.
    pub username: String,
    /// HTML-escaped post body.
    pub content: String,
    /// Creation timestamp (ISO-8601).
    pub created_at: DateTime<Utc>,
}

/// A registered account. Never serialized to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Unique, trimmed username.
    pub username: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}
