//! Persistence layer: users and posts.
//!
//! [`Storage`] dispatches to one of two backends with identical
//! semantics: [`MemoryStore`] (default, and used by tests) or
//! [`PostgresStore`] when `PERSISTENCE_ENABLED` is set.

pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryStore;
pub use models::{NewPost, NewUser};
pub use postgres::PostgresStore;

use crate::config::GatewayConfig;
use crate::domain::{Post, User, UserId};
use crate::error::GatewayError;

/// Storage backend selected at startup.
#[derive(Debug)]
pub enum Storage {
    /// Process-local maps.
    Memory(MemoryStore),
    /// PostgreSQL via `sqlx`.
    Postgres(PostgresStore),
}

impl Storage {
    /// Builds the backend selected by `config.persistence_enabled`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if PostgreSQL is
    /// selected and cannot be reached or migrated.
    pub async fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        if config.persistence_enabled {
            Ok(Self::Postgres(PostgresStore::connect(config).await?))
        } else {
            tracing::warn!("persistence disabled, users and posts are kept in memory");
            Ok(Self::in_memory())
        }
    }

    /// Empty in-memory storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    /// Inserts a user.
    ///
    /// # Errors
    ///
    /// [`GatewayError::UsernameTaken`] for a duplicate username, or a
    /// [`GatewayError::PersistenceError`].
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, GatewayError> {
        match self {
            Self::Memory(store) => store.create_user(new_user).await,
            Self::Postgres(store) => store.create_user(new_user).await,
        }
    }

    /// Looks a user up by username.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, GatewayError> {
        match self {
            Self::Memory(store) => Ok(store.find_user_by_username(username).await),
            Self::Postgres(store) => store.find_user_by_username(username).await,
        }
    }

    /// Looks a user up by id.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, GatewayError> {
        match self {
            Self::Memory(store) => Ok(store.find_user_by_id(id).await),
            Self::Postgres(store) => store.find_user_by_id(id).await,
        }
    }

    /// Inserts a post.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn insert_post(&self, new_post: NewPost) -> Result<Post, GatewayError> {
        match self {
            Self::Memory(store) => Ok(store.insert_post(new_post).await),
            Self::Postgres(store) => store.insert_post(new_post).await,
        }
    }

    /// Returns every post, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn list_posts(&self) -> Result<Vec<Post>, GatewayError> {
        match self {
            Self::Memory(store) => Ok(store.list_posts().await),
            Self::Postgres(store) => store.list_posts().await,
        }
    }
}
