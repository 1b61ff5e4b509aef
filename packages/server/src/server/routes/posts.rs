//! Feed endpoints: posts, likes and comments.

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::common::{AppResult, PageQuery, PostId};
use crate::domains::posts::actions::{
    add_comment, create_post, delete_post, list_feed, post_detail, toggle_like,
    CreatePostOutcome,
};
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    pub parent_id: Option<i64>,
    pub reply_to_user_id: Option<i64>,
}

pub async fn list_posts_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<PageQuery>,
    auth: Option<AuthUser>,
) -> AppResult<Json<serde_json::Value>> {
    let viewer = auth.map(|a| a.user_id);
    let page = list_feed(&query, viewer, &state.deps.db_pool).await?;
    Ok(Json(json!({ "success": true, "posts": page })))
}

pub async fn post_detail_handler(
    Extension(state): Extension<AxumAppState>,
    Path(post_id): Path<PostId>,
    auth: Option<AuthUser>,
) -> AppResult<Json<serde_json::Value>> {
    let viewer = auth.map(|a| a.user_id);
    let detail = post_detail(post_id, viewer, &state.deps.db_pool).await?;
    Ok(Json(json!({ "success": true, "post": detail })))
}

/// Publishing is gated on identity verification; an unverified caller gets a
/// `needVerify` flag so the client can open the verify flow.
pub async fn create_post_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Json(body): Json<CreatePostRequest>,
) -> AppResult<Response> {
    match create_post(auth.user_id, &body.content, &body.images, &state.deps).await? {
        CreatePostOutcome::Created(id) => {
            Ok(Json(json!({ "success": true, "id": id })).into_response())
        }
        CreatePostOutcome::NeedVerify => Ok((
            StatusCode::FORBIDDEN,
            Json(json!({
                "success": false,
                "message": "请先完成实名认证",
                "needVerify": true,
            })),
        )
            .into_response()),
    }
}

pub async fn delete_post_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Path(post_id): Path<PostId>,
) -> AppResult<Json<serde_json::Value>> {
    delete_post(auth.user_id, post_id, &state.deps.db_pool).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn toggle_like_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Path(post_id): Path<PostId>,
) -> AppResult<Json<serde_json::Value>> {
    let is_liked = toggle_like(auth.user_id, post_id, &state.deps.db_pool).await?;
    Ok(Json(json!({ "success": true, "isLiked": is_liked })))
}

pub async fn create_comment_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Path(post_id): Path<PostId>,
    Json(body): Json<CreateCommentRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let id = add_comment(
        auth.user_id,
        post_id,
        &body.content,
        body.parent_id,
        body.reply_to_user_id,
        &state.deps.db_pool,
    )
    .await?;
    Ok(Json(json!({ "success": true, "id": id })))
}
