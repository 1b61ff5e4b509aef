use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::common::{ConversationId, MessageId};
use crate::domains::messaging::models::Message;
use crate::domains::users::models::PublicUser;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub content: String,
    pub message_type: String,
    pub created_at: DateTime<Utc>,
    pub sender: PublicUser,
}

impl MessageView {
    pub fn new(message: Message, sender: PublicUser) -> Self {
        MessageView {
            id: message.id,
            conversation_id: message.conversation_id,
            content: message.content,
            message_type: message.message_type,
            created_at: message.created_at,
            sender,
        }
    }
}

/// An inbox entry: the conversation plus what the list screen renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    pub id: ConversationId,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub member_count: usize,
    pub updated_at: DateTime<Utc>,
    /// The counterpart in a private chat; absent for groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_user: Option<PublicUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<MessageView>,
}
