//! Inbox assembly.

use std::collections::HashSet;

use sqlx::PgPool;

use crate::common::{AppResult, UserId};
use crate::domains::messaging::actions::views::{ConversationView, MessageView};
use crate::domains::messaging::models::{Conversation, ConversationMember, Message};
use crate::domains::posts::actions::views::resolve_users;
use crate::domains::users::models::User;

/// The caller's conversations, most recently active first, each with member
/// count, the counterpart (for private chats) and the last message.
pub async fn list_conversations(user_id: UserId, pool: &PgPool) -> AppResult<Vec<ConversationView>> {
    let conversations = Conversation::list_for_user(user_id, pool).await?;

    let mut views = Vec::with_capacity(conversations.len());
    for conversation in conversations {
        let members = ConversationMember::list(conversation.id, pool).await?;
        let last_message = Message::last_for_conversation(conversation.id, pool).await?;

        let mut wanted: HashSet<UserId> = HashSet::new();
        if conversation.is_private() {
            wanted.extend(members.iter().map(|m| m.user_id).filter(|&id| id != user_id));
        }
        if let Some(msg) = &last_message {
            wanted.insert(msg.sender_id);
        }
        let users = resolve_users(&wanted, pool).await?;

        let other_user = if conversation.is_private() {
            members
                .iter()
                .map(|m| m.user_id)
                .find(|&id| id != user_id)
                .map(|id| {
                    users
                        .get(&id)
                        .cloned()
                        .unwrap_or_else(|| User::public_placeholder(id))
                })
        } else {
            None
        };

        let last_message = last_message.map(|msg| {
            let sender = users
                .get(&msg.sender_id)
                .cloned()
                .unwrap_or_else(|| User::public_placeholder(msg.sender_id));
            MessageView::new(msg, sender)
        });

        views.push(ConversationView {
            id: conversation.id,
            kind: conversation.kind,
            name: conversation.name,
            avatar: conversation.avatar,
            member_count: members.len(),
            updated_at: conversation.updated_at,
            other_user,
            last_message,
        });
    }
    Ok(views)
}
