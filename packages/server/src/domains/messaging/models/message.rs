use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

use crate::common::{ConversationId, MessageId, UserId};

pub const MESSAGE_TEXT: &str = "text";
pub const MESSAGE_IMAGE: &str = "image";
pub const MESSAGE_SYSTEM: &str = "system";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub content: String,
    pub message_type: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Message {
    /// Insert a message and bump the conversation's activity timestamp in one
    /// transaction.
    pub async fn insert(
        conversation_id: ConversationId,
        sender_id: UserId,
        content: &str,
        message_type: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let mut tx = pool.begin().await?;
        let message = Self::insert_in(conversation_id, sender_id, content, message_type, &mut *tx)
            .await?;
        sqlx::query("UPDATE conversations SET updated_at = now() WHERE id = $1")
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(message)
    }

    /// Bare insert for callers managing their own transaction (e.g. seeding
    /// a system message while creating the conversation).
    pub async fn insert_in<'e>(
        conversation_id: ConversationId,
        sender_id: UserId,
        content: &str,
        message_type: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (conversation_id, sender_id, content, message_type)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .bind(message_type)
        .fetch_one(executor)
        .await?;
        Ok(message)
    }

    /// Newest-first keyset fetch below `cursor`; callers reverse for display.
    pub async fn list(
        conversation_id: ConversationId,
        limit: i64,
        cursor: Option<i64>,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT * FROM messages
            WHERE conversation_id = $1
              AND ($3::bigint IS NULL OR id < $3)
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(conversation_id)
        .bind(limit)
        .bind(cursor)
        .fetch_all(pool)
        .await?;
        Ok(messages)
    }

    pub async fn last_for_conversation(
        conversation_id: ConversationId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let message = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE conversation_id = $1 ORDER BY id DESC LIMIT 1",
        )
        .bind(conversation_id)
        .fetch_optional(pool)
        .await?;
        Ok(message)
    }
}
