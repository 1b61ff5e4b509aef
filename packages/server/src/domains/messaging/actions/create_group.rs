//! Create a group conversation.

use sqlx::PgPool;
use tracing::info;

use crate::common::validation::validate_length;
use crate::common::{AppError, AppResult, ConversationId, UserId};
use crate::domains::messaging::models::{
    ConversationMember, Conversation, Message, CONVERSATION_GROUP, MESSAGE_SYSTEM,
};

/// Create a group owned by the caller. The member list is deduplicated and
/// the owner joins implicitly; a system message marks the start of the thread.
pub async fn create_group(
    owner_id: UserId,
    name: &str,
    member_ids: &[UserId],
    pool: &PgPool,
) -> AppResult<ConversationId> {
    validate_length(name, 1, 100, "群名称")?;
    if member_ids.is_empty() {
        return Err(AppError::Validation("请选择群成员".to_string()));
    }

    let mut members: Vec<UserId> = vec![owner_id];
    for &id in member_ids {
        if !members.contains(&id) {
            members.push(id);
        }
    }

    let mut tx = pool.begin().await?;
    let conversation_id =
        Conversation::insert(CONVERSATION_GROUP, Some(name), Some(owner_id), &mut *tx).await?;
    for member in &members {
        ConversationMember::add(conversation_id, *member, &mut *tx).await?;
    }
    Message::insert_in(conversation_id, owner_id, "群聊已创建", MESSAGE_SYSTEM, &mut *tx).await?;
    tx.commit().await?;

    info!(
        owner_id = %owner_id,
        conversation_id = %conversation_id,
        members = members.len(),
        "group conversation created"
    );
    Ok(conversation_id)
}
