use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{CommentId, PostId, UserId};

/// Comment - top-level (`parent_id` null) or a reply.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub content: String,
    pub parent_id: Option<i64>,
    pub reply_to_user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Comment {
    /// Insert a comment and bump the post's comment counter atomically.
    pub async fn insert(
        post_id: PostId,
        user_id: UserId,
        content: &str,
        parent_id: Option<i64>,
        reply_to_user_id: Option<i64>,
        pool: &PgPool,
    ) -> Result<CommentId> {
        let mut tx = pool.begin().await?;

        let id: CommentId = sqlx::query_scalar(
            r#"
            INSERT INTO comments (post_id, user_id, content, parent_id, reply_to_user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .bind(parent_id)
        .bind(reply_to_user_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE posts SET comment_count = comment_count + 1 WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(id)
    }

    pub async fn list_by_post(post_id: PostId, pool: &PgPool) -> Result<Vec<Self>> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE post_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await?;
        Ok(comments)
    }
}
