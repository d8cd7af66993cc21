//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use chat_core::{now_millis, Id, Reaction, ReactionRepository, ReactionWrite, RepoResult};

use crate::models::ReactionModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Bump `update_at` and recompute `has_reactions` for the given posts,
/// returning the new `update_at` of each post found
async fn refresh_posts(
    tx: &mut Transaction<'_, Postgres>,
    post_ids: &[String],
    now: i64,
) -> RepoResult<Vec<i64>> {
    sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE posts
        SET update_at = GREATEST($2, update_at + 1),
            has_reactions = EXISTS (SELECT 1 FROM reactions r WHERE r.post_id = posts.id)
        WHERE id = ANY($1)
        RETURNING update_at
        "#,
    )
    .bind(post_ids)
    .bind(now)
    .fetch_all(&mut **tx)
    .await
    .map_err(map_db_error)
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn save(&self, reaction: &Reaction) -> RepoResult<ReactionWrite<Reaction>> {
        let mut reaction = reaction.clone();
        reaction.pre_save();

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // DO UPDATE rather than DO NOTHING so RETURNING yields the existing row
        let stored = sqlx::query_as::<_, ReactionModel>(
            r#"
            INSERT INTO reactions (user_id, post_id, emoji_name, create_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (post_id, user_id, emoji_name)
                DO UPDATE SET emoji_name = EXCLUDED.emoji_name
            RETURNING user_id, post_id, emoji_name, create_at
            "#,
        )
        .bind(reaction.user_id.as_str())
        .bind(reaction.post_id.as_str())
        .bind(&reaction.emoji_name)
        .bind(reaction.create_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let post_update_at = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE posts
            SET has_reactions = TRUE, update_at = GREATEST($2, update_at + 1)
            WHERE id = $1
            RETURNING update_at
            "#,
        )
        .bind(reaction.post_id.as_str())
        .bind(now_millis())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(ReactionWrite::new(Reaction::try_from(stored)?, post_update_at))
    }

    #[instrument(skip(self))]
    async fn delete(&self, reaction: &Reaction) -> RepoResult<ReactionWrite<()>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            DELETE FROM reactions WHERE post_id = $1 AND user_id = $2 AND emoji_name = $3
            "#,
        )
        .bind(reaction.post_id.as_str())
        .bind(reaction.user_id.as_str())
        .bind(&reaction.emoji_name)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let stamps = refresh_posts(&mut tx, &[reaction.post_id.to_string()], now_millis()).await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(ReactionWrite::new((), stamps.first().copied()))
    }

    #[instrument(skip(self))]
    async fn delete_all_with_emoji_name(&self, emoji_name: &str) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let post_ids = sqlx::query_scalar::<_, String>(
            r#"
            DELETE FROM reactions WHERE emoji_name = $1 RETURNING post_id
            "#,
        )
        .bind(emoji_name)
        .fetch_all(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let removed = post_ids.len() as u64;

        let mut affected = post_ids;
        affected.sort_unstable();
        affected.dedup();
        if !affected.is_empty() {
            refresh_posts(&mut tx, &affected, now_millis()).await?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn find_by_post(&self, post_id: Id) -> RepoResult<Vec<Reaction>> {
        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT user_id, post_id, emoji_name, create_at
            FROM reactions
            WHERE post_id = $1
            ORDER BY create_at, user_id, emoji_name
            "#,
        )
        .bind(post_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Reaction::try_from).collect()
    }
}
