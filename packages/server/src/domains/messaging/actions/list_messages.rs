//! Message history with keyset pagination.

use std::collections::HashSet;

use sqlx::PgPool;

use crate::common::{paginate, AppError, AppResult, ConversationId, Page, PageQuery, UserId};
use crate::domains::messaging::actions::views::MessageView;
use crate::domains::messaging::models::{ConversationMember, Message};
use crate::domains::posts::actions::views::resolve_users;
use crate::domains::users::models::User;

const DEFAULT_PAGE: i64 = 50;
const MAX_PAGE: i64 = 100;

/// Page through a conversation the caller belongs to. Rows are fetched newest
/// first for the cursor, then reversed so the client renders oldest first.
pub async fn list_messages(
    user_id: UserId,
    conversation_id: ConversationId,
    query: &PageQuery,
    pool: &PgPool,
) -> AppResult<Page<MessageView>> {
    if !ConversationMember::is_member(conversation_id, user_id, pool).await? {
        return Err(AppError::Forbidden("您不在该会话中".to_string()));
    }

    let limit = query.limit_or(DEFAULT_PAGE, MAX_PAGE);
    let rows = Message::list(conversation_id, limit + 1, query.cursor, pool).await?;
    let (mut rows, next_cursor) = paginate(rows, limit, |msg| msg.id.as_i64());
    rows.reverse();

    let sender_ids: HashSet<UserId> = rows.iter().map(|m| m.sender_id).collect();
    let users = resolve_users(&sender_ids, pool).await?;

    let items = rows
        .into_iter()
        .map(|msg| {
            let sender = users
                .get(&msg.sender_id)
                .cloned()
                .unwrap_or_else(|| User::public_placeholder(msg.sender_id));
            MessageView::new(msg, sender)
        })
        .collect();
    Ok(Page { items, next_cursor })
}
