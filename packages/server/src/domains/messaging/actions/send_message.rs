//! Send a message into a conversation.

use sqlx::PgPool;

use crate::common::validation::validate_length;
use crate::common::{AppError, AppResult, ConversationId, UserId};
use crate::domains::messaging::actions::views::MessageView;
use crate::domains::messaging::models::{
    Conversation, ConversationMember, Message, MESSAGE_IMAGE, MESSAGE_TEXT,
};
use crate::domains::users::models::User;

pub async fn send_message(
    user_id: UserId,
    conversation_id: ConversationId,
    content: &str,
    message_type: &str,
    pool: &PgPool,
) -> AppResult<MessageView> {
    validate_length(content, 1, 2000, "消息")?;
    if message_type != MESSAGE_TEXT && message_type != MESSAGE_IMAGE {
        return Err(AppError::Validation("不支持的消息类型".to_string()));
    }

    if Conversation::find_by_id(conversation_id, pool).await?.is_none() {
        return Err(AppError::NotFound);
    }
    if !ConversationMember::is_member(conversation_id, user_id, pool).await? {
        return Err(AppError::Forbidden("您不在该会话中".to_string()));
    }

    let message = Message::insert(conversation_id, user_id, content, message_type, pool).await?;
    let sender = User::find_by_id(user_id, pool)
        .await?
        .map(|u| u.to_public())
        .unwrap_or_else(|| User::public_placeholder(user_id));
    Ok(MessageView::new(message, sender))
}
