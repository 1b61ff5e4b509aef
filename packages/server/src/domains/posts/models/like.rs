use anyhow::Result;
use sqlx::PgPool;

use crate::common::{PostId, UserId};

/// Like toggling and lookup.
///
/// The existence flip and the counter adjustment always travel in one
/// transaction so concurrent toggles cannot lose updates.
pub struct Like;

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Like {
    /// Toggle a like. Returns the resulting state: true = now liked.
    pub async fn toggle(user_id: UserId, post_id: PostId, pool: &PgPool) -> Result<bool> {
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        let is_liked = if deleted.rows_affected() > 0 {
            // Floor at zero: a stale row must never drive the counter negative.
            sqlx::query("UPDATE posts SET like_count = GREATEST(like_count - 1, 0) WHERE id = $1")
                .bind(post_id)
                .execute(&mut *tx)
                .await?;
            false
        } else {
            let inserted = sqlx::query(
                "INSERT INTO likes (user_id, post_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
            if inserted.rows_affected() > 0 {
                sqlx::query("UPDATE posts SET like_count = like_count + 1 WHERE id = $1")
                    .bind(post_id)
                    .execute(&mut *tx)
                    .await?;
            }
            true
        };

        tx.commit().await?;
        Ok(is_liked)
    }

    /// Which of `post_ids` the user has liked.
    pub async fn liked_post_ids(
        user_id: UserId,
        post_ids: &[PostId],
        pool: &PgPool,
    ) -> Result<Vec<PostId>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = post_ids.iter().map(|id| id.as_i64()).collect();
        let ids = sqlx::query_scalar::<_, PostId>(
            "SELECT post_id FROM likes WHERE user_id = $1 AND post_id = ANY($2)",
        )
        .bind(user_id)
        .bind(&raw)
        .fetch_all(pool)
        .await?;
        Ok(ids)
    }
}
