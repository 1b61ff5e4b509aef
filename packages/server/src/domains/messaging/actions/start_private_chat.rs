//! Start (or resume) a private chat.

use sqlx::PgPool;
use tracing::info;

use crate::common::{AppError, AppResult, ConversationId, UserId};
use crate::domains::messaging::models::{
    Conversation, ConversationMember, CONVERSATION_PRIVATE,
};
use crate::domains::users::models::User;

/// Find or create the private conversation between the caller and the target.
/// There is at most one per pair; a repeat call returns the existing one.
pub async fn start_private_chat(
    user_id: UserId,
    target_user_id: UserId,
    pool: &PgPool,
) -> AppResult<ConversationId> {
    if user_id == target_user_id {
        return Err(AppError::Validation("不能和自己聊天".to_string()));
    }
    if User::find_by_id(target_user_id, pool).await?.is_none() {
        return Err(AppError::NotFound);
    }

    if let Some(existing) = Conversation::find_private_between(user_id, target_user_id, pool).await?
    {
        return Ok(existing.id);
    }

    let mut tx = pool.begin().await?;
    let conversation_id =
        Conversation::insert(CONVERSATION_PRIVATE, None, None, &mut *tx).await?;
    ConversationMember::add(conversation_id, user_id, &mut *tx).await?;
    ConversationMember::add(conversation_id, target_user_id, &mut *tx).await?;
    tx.commit().await?;

    info!(
        user_id = %user_id,
        target_user_id = %target_user_id,
        conversation_id = %conversation_id,
        "private conversation created"
    );
    Ok(conversation_id)
}
