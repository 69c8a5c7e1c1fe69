//! Insert models shared by both storage backends.
//!
//! Identifiers and timestamps are assigned here, in the application, so
//! the in-memory and PostgreSQL backends hand back identical records.

use chrono::{DurationRound, TimeDelta, Utc};

use crate::domain::{Post, PostId, User, UserId};

/// Current time truncated to whole milliseconds, which PostgreSQL
/// `TIMESTAMPTZ` stores without loss.
fn now_millis() -> chrono::DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(TimeDelta::milliseconds(1)).unwrap_or(now)
}

/// A user about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Trimmed, non-empty username.
    pub username: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
}

impl NewUser {
    /// Materializes the stored record with a fresh id and timestamp.
    #[must_use]
    pub fn into_user(self) -> User {
        User {
            id: UserId::new(),
            username: self.username,
            password_hash: self.password_hash,
            created_at: now_millis(),
        }
    }
}

/// A post about to be inserted.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Author identifier.
    pub user_id: UserId,
    /// Author username.
    pub username: String,
    /// Escaped, non-empty content.
    pub content: String,
}

impl NewPost {
    /// Materializes the stored record with a fresh id and timestamp.
    #[must_use]
    pub fn into_post(self) -> Post {
        Post {
            id: PostId::new(),
            user_id: self.user_id,
            username: self.username,
            content: self.content,
            created_at: now_millis(),
        }
    }
}
