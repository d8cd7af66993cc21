//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chat_core::{Id, Post, PostRepository, RepoResult};

use crate::models::PostModel;

use super::error::map_db_error;

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new PgPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a post row
    ///
    /// Posts are authored elsewhere; this exists for seeding and tests.
    #[instrument(skip(self, post), fields(post_id = %post.id))]
    pub async fn insert(&self, post: &Post) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, channel_id, user_id, message, has_reactions, create_at, update_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(post.id.as_str())
        .bind(post.channel_id.as_str())
        .bind(post.user_id.as_str())
        .bind(&post.message)
        .bind(post.has_reactions)
        .bind(post.create_at)
        .bind(post.update_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(
            r#"
            SELECT id, channel_id, user_id, message, has_reactions, create_at, update_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Post::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_channel(&self, channel_id: Id, limit: i64) -> RepoResult<Vec<Post>> {
        let limit = limit.clamp(1, 200);

        let results = sqlx::query_as::<_, PostModel>(
            r#"
            SELECT id, channel_id, user_id, message, has_reactions, create_at, update_at
            FROM posts
            WHERE channel_id = $1
            ORDER BY create_at DESC
            LIMIT $2
            "#,
        )
        .bind(channel_id.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Post::try_from).collect()
    }
}
