//! In-process storage backend.
//!
//! Used when persistence is disabled and throughout the test suite. Data
//! lives for the lifetime of the process.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::models::{NewPost, NewUser};
use crate::domain::{Post, User, UserId};
use crate::error::GatewayError;

/// Users and posts held behind [`tokio::sync::RwLock`]s.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    posts: RwLock<Vec<Post>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UsernameTaken`] if the username exists.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, GatewayError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == new_user.username) {
            return Err(GatewayError::UsernameTaken);
        }
        let user = new_user.into_user();
        users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Looks a user up by username.
    pub async fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    /// Looks a user up by id.
    pub async fn find_user_by_id(&self, id: UserId) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    /// Appends a post.
    pub async fn insert_post(&self, new_post: NewPost) -> Post {
        let post = new_post.into_post();
        self.posts.write().await.push(post.clone());
        post
    }

    /// Returns every post, newest first.
    pub async fn list_posts(&self) -> Vec<Post> {
        let posts = self.posts.read().await;
        posts.iter().rev().cloned().collect()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::new();
        assert!(store.create_user(new_user("ada")).await.is_ok());
        assert!(matches!(
            store.create_user(new_user("ada")).await,
            Err(GatewayError::UsernameTaken)
        ));
    }

    #[tokio::test]
    async fn users_are_found_by_name_and_id() {
        let store = MemoryStore::new();
        let Ok(user) = store.create_user(new_user("grace")).await else {
            panic!("insert failed");
        };
        assert_eq!(store.find_user_by_username("grace").await, Some(user.clone()));
        assert_eq!(store.find_user_by_id(user.id).await, Some(user));
        assert!(store.find_user_by_username("nobody").await.is_none());
    }

    #[tokio::test]
    async fn posts_are_listed_newest_first() {
        let store = MemoryStore::new();
        let user_id = UserId::new();
        for content in ["first", "second"] {
            store
                .insert_post(NewPost {
                    user_id,
                    username: "ada".to_string(),
                    content: content.to_string(),
                })
                .await;
        }
        let contents: Vec<String> = store
            .list_posts()
            .await
            .into_iter()
            .map(|p| p.content)
            .collect();
        assert_eq!(contents, ["second", "first"]);
    }
}
