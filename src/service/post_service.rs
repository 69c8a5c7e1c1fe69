//! Post service: stores posts and publishes them to live connections.

use std::sync::Arc;

use crate::auth::Identity;
use crate::domain::sanitize::escape_html;
use crate::domain::{Event, Hub, Post};
use crate::error::GatewayError;
use crate::persistence::{NewPost, Storage};

/// Publisher for created posts.
///
/// Every successful [`PostService::create_post`] follows the pattern:
/// validate → resolve author → persist → broadcast exactly once. Nothing
/// is broadcast when any earlier step fails.
#[derive(Debug, Clone)]
pub struct PostService {
    storage: Arc<Storage>,
    hub: Hub,
}

impl PostService {
    /// Creates a new `PostService`.
    #[must_use]
    pub fn new(storage: Arc<Storage>, hub: Hub) -> Self {
        Self { storage, hub }
    }

    /// Stores a post by `author` and broadcasts it.
    ///
    /// Content is trimmed and HTML-escaped before storage.
    ///
    /// # Errors
    ///
    /// [`GatewayError::InvalidRequest`] for empty content,
    /// [`GatewayError::Internal`] if the author no longer exists, or a
    /// storage error. No event is broadcast in any of these cases.
    pub async fn create_post(&self, author: Identity, content: &str) -> Result<Post, GatewayError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "Post content cannot be empty".to_string(),
            ));
        }

        let Some(user) = self.storage.find_user_by_id(author.user_id).await? else {
            tracing::error!(user_id = %author.user_id, "token refers to unknown user");
            return Err(GatewayError::Internal("Error processing request".to_string()));
        };

        let post = self
            .storage
            .insert_post(NewPost {
                user_id: user.id,
                username: user.username,
                content: escape_html(content),
            })
            .await?;

        match Event::from_post(&post) {
            Ok(event) => self.hub.broadcast(event),
            Err(e) => tracing::error!(post_id = %post.id, error = %e, "failed to encode post"),
        }

        tracing::info!(post_id = %post.id, user_id = %post.user_id, "post created");
        Ok(post)
    }

    /// Returns every post, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn list_posts(&self) -> Result<Vec<Post>, GatewayError> {
        self.storage.list_posts().await
    }
}
