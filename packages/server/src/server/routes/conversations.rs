//! Messaging endpoints.

use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::common::{AppResult, ConversationId, PageQuery, UserId};
use crate::domains::messaging::actions::{
    create_group, list_conversations, list_messages, send_message, start_private_chat,
};
use crate::domains::messaging::models::MESSAGE_TEXT;
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPrivateChatRequest {
    pub target_user_id: UserId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub name: String,
    pub member_ids: Vec<UserId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub content: String,
    pub message_type: Option<String>,
}

pub async fn list_conversations_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    let conversations = list_conversations(auth.user_id, &state.deps.db_pool).await?;
    Ok(Json(json!({ "success": true, "conversations": conversations })))
}

pub async fn list_messages_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Path(conversation_id): Path<ConversationId>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let page = list_messages(auth.user_id, conversation_id, &query, &state.deps.db_pool).await?;
    Ok(Json(json!({ "success": true, "messages": page })))
}

pub async fn send_message_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Path(conversation_id): Path<ConversationId>,
    Json(body): Json<SendMessageRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let message_type = body.message_type.as_deref().unwrap_or(MESSAGE_TEXT);
    let message = send_message(
        auth.user_id,
        conversation_id,
        &body.content,
        message_type,
        &state.deps.db_pool,
    )
    .await?;
    Ok(Json(json!({ "success": true, "message": message })))
}

pub async fn start_private_chat_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Json(body): Json<StartPrivateChatRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let conversation_id =
        start_private_chat(auth.user_id, body.target_user_id, &state.deps.db_pool).await?;
    Ok(Json(json!({ "success": true, "conversationId": conversation_id })))
}

pub async fn create_group_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Json(body): Json<CreateGroupRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let conversation_id =
        create_group(auth.user_id, &body.name, &body.member_ids, &state.deps.db_pool).await?;
    Ok(Json(json!({ "success": true, "conversationId": conversation_id })))
}
