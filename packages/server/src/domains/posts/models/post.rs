use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::common::{PostId, UserId};

/// Post - a feed entry with optional images.
///
/// `like_count`/`comment_count` are denormalized counters; every mutation of
/// `likes`/`comments` adjusts them in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub content: String,
    pub images: Option<Json<Vec<String>>>,
    pub like_count: i32,
    pub comment_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn image_list(&self) -> Vec<String> {
        self.images.as_ref().map(|j| j.0.clone()).unwrap_or_default()
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Post {
    pub async fn insert(
        user_id: UserId,
        content: &str,
        images: &[String],
        pool: &PgPool,
    ) -> Result<PostId> {
        let id: PostId = sqlx::query_scalar(
            r#"
            INSERT INTO posts (user_id, content, images)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(content)
        .bind(Json(images.to_vec()))
        .fetch_one(pool)
        .await?;
        Ok(id)
    }

    pub async fn find_by_id(id: PostId, pool: &PgPool) -> Result<Option<Self>> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(post)
    }

    /// Newest-first keyset listing, optionally restricted to one author.
    /// Fetches up to `limit` rows below the cursor.
    pub async fn list(
        limit: i64,
        cursor: Option<i64>,
        user_id: Option<UserId>,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT * FROM posts
            WHERE ($2::bigint IS NULL OR id < $2)
              AND ($3::bigint IS NULL OR user_id = $3)
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .bind(cursor)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(posts)
    }

    pub async fn delete(id: PostId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn search_by_content(keyword: &str, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let pattern = format!("%{}%", keyword);
        let posts = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE content LIKE $1 ORDER BY id DESC LIMIT $2",
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(posts)
    }
}
