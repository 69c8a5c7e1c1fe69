//! Serialized broadcast payloads.
//!
//! An [`Event`] is encoded once by the publisher and then shared by every
//! connection's outbound queue, so cloning it only bumps a reference count.

use std::sync::Arc;

use super::Post;

/// Immutable, pre-serialized payload handed to [`super::Hub::broadcast`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    payload: Arc<str>,
}

impl Event {
    /// Wraps an already serialized payload.
    #[must_use]
    pub fn from_text(payload: impl Into<Arc<str>>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Encodes a created post as its JSON record
    /// (`id`, `user_id`, `username`, `content`, `created_at`).
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] raised while encoding.
    pub fn from_post(post: &Post) -> Result<Self, serde_json::Error> {
        serde_json::to_string(post).map(Self::from_text)
    }

    /// Returns the payload exactly as it goes on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.payload
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::{PostId, UserId};

    #[test]
    fn post_encodes_as_flat_record() {
        let Some(created_at) = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single() else {
            panic!("valid timestamp");
        };
        let post = Post {
            id: PostId::new(),
            user_id: UserId::new(),
            username: "ada".to_string(),
            content: "hello".to_string(),
            created_at,
        };
        let Ok(event) = Event::from_post(&post) else {
            panic!("encoding failed");
        };
        let Ok(value) = serde_json::from_str::<serde_json::Value>(event.as_str()) else {
            panic!("payload is not json");
        };
        let Some(obj) = value.as_object() else {
            panic!("payload is not an object");
        };
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["content", "created_at", "id", "user_id", "username"]);
        assert_eq!(value["id"], post.id.to_string());
        assert_eq!(value["created_at"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn text_payload_is_verbatim() {
        let event = Event::from_text(r#"{"content":"hello"}"#);
        assert_eq!(event.as_str(), r#"{"content":"hello"}"#);
    }
}
