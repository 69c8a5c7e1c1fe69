//! PostgreSQL implementation of the persistence layer.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::models::{NewPost, NewUser};
use crate::config::GatewayConfig;
use crate::domain::{Post, PostId, User, UserId};
use crate::error::GatewayError;

type UserRow = (Uuid, String, String, DateTime<Utc>);
type PostRow = (Uuid, Uuid, String, String, DateTime<Utc>);

fn user_from_row((id, username, password_hash, created_at): UserRow) -> User {
    User {
        id: UserId::from_uuid(id),
        username,
        password_hash,
        created_at,
    }
}

fn post_from_row((id, user_id, username, content, created_at): PostRow) -> Post {
    Post {
        id: PostId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        username,
        content,
        created_at,
    }
}

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects using the pool settings in `config` and applies pending
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the database is
    /// unreachable or a migration fails.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        tracing::info!("connected to PostgreSQL, migrations applied");
        Ok(Self::new(pool))
    }

    /// Inserts a user.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UsernameTaken`] on a unique violation and
    /// [`GatewayError::PersistenceError`] on other database failures.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, GatewayError> {
        let user = new_user.into_user();
        let result = sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(*user.id.as_uuid())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(GatewayError::UsernameTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Looks a user up by username.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, GatewayError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(user_from_row))
    }

    /// Looks a user up by id.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, GatewayError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(user_from_row))
    }

    /// Inserts a post.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn insert_post(&self, new_post: NewPost) -> Result<Post, GatewayError> {
        let post = new_post.into_post();
        sqlx::query(
            "INSERT INTO posts (id, user_id, username, content, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(*post.id.as_uuid())
        .bind(*post.user_id.as_uuid())
        .bind(&post.username)
        .bind(&post.content)
        .bind(post.created_at)
        .execute(&self.pool)
        .await?;
        Ok(post)
    }

    /// Returns every post, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn list_posts(&self) -> Result<Vec<Post>, GatewayError> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, user_id, username, content, created_at FROM posts \
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(post_from_row).collect())
    }
}
