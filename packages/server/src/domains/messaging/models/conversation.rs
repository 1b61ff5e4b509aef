use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

use crate::common::{ConversationId, UserId};

pub const CONVERSATION_PRIVATE: &str = "private";
pub const CONVERSATION_GROUP: &str = "group";

/// Conversation - a private pair or a named group.
///
/// `updated_at` doubles as the activity timestamp: every new message bumps it
/// in the same transaction so the inbox ordering stays consistent.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: ConversationId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn is_private(&self) -> bool {
        self.kind == CONVERSATION_PRIVATE
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConversationMember {
    pub id: i64,
    pub conversation_id: ConversationId,
    pub user_id: UserId,
    pub last_read_message_id: Option<i64>,
    pub joined_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Conversation {
    /// Insert a conversation row. Runs inside the caller's transaction when
    /// members and a seed message must land atomically with it.
    pub async fn insert<'e>(
        kind: &str,
        name: Option<&str>,
        owner_id: Option<UserId>,
        executor: impl PgExecutor<'e>,
    ) -> Result<ConversationId> {
        let id: ConversationId = sqlx::query_scalar(
            r#"
            INSERT INTO conversations (type, name, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(kind)
        .bind(name)
        .bind(owner_id)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    pub async fn find_by_id(id: ConversationId, pool: &PgPool) -> Result<Option<Self>> {
        let conversation =
            sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(conversation)
    }

    /// The existing private conversation between two users, if any.
    pub async fn find_private_between(
        a: UserId,
        b: UserId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT c.* FROM conversations c
            JOIN conversation_members m1 ON m1.conversation_id = c.id AND m1.user_id = $1
            JOIN conversation_members m2 ON m2.conversation_id = c.id AND m2.user_id = $2
            WHERE c.type = 'private'
            LIMIT 1
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_optional(pool)
        .await?;
        Ok(conversation)
    }

    /// Caller's inbox, most recently active first.
    pub async fn list_for_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        let conversations = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT c.* FROM conversations c
            JOIN conversation_members m ON m.conversation_id = c.id
            WHERE m.user_id = $1
            ORDER BY c.updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(conversations)
    }
}

impl ConversationMember {
    pub async fn add<'e>(
        conversation_id: ConversationId,
        user_id: UserId,
        executor: impl PgExecutor<'e>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO conversation_members (conversation_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn list(conversation_id: ConversationId, pool: &PgPool) -> Result<Vec<Self>> {
        let members = sqlx::query_as::<_, ConversationMember>(
            "SELECT * FROM conversation_members WHERE conversation_id = $1 ORDER BY joined_at",
        )
        .bind(conversation_id)
        .fetch_all(pool)
        .await?;
        Ok(members)
    }

    pub async fn is_member(
        conversation_id: ConversationId,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM conversation_members WHERE conversation_id = $1 AND user_id = $2",
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }
}
