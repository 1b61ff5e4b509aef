//! User profile endpoints.

use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::common::{AppError, AppResult, PageQuery, UserId};
use crate::domains::posts::actions::list_user_posts;
use crate::domains::users::actions::{bind_phone, update_profile};
use crate::domains::users::models::User;
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

#[derive(Deserialize)]
pub struct BindPhoneRequest {
    pub phone: String,
    pub code: String,
}

pub async fn profile_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    let user = User::find_by_id(auth.user_id, &state.deps.db_pool)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(json!({ "success": true, "user": user.to_profile() })))
}

pub async fn update_profile_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Json(body): Json<UpdateProfileRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let profile = update_profile(
        auth.user_id,
        body.nickname.as_deref(),
        body.avatar.as_deref(),
        body.bio.as_deref(),
        &state.deps.db_pool,
    )
    .await?;
    Ok(Json(json!({ "success": true, "user": profile })))
}

pub async fn bind_phone_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Json(body): Json<BindPhoneRequest>,
) -> AppResult<Json<serde_json::Value>> {
    bind_phone(auth.user_id, &body.phone, &body.code, &state.deps.db_pool).await?;
    Ok(Json(json!({ "success": true })))
}

/// Another user's public profile, or null when the id does not resolve.
pub async fn public_user_handler(
    Extension(state): Extension<AxumAppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<serde_json::Value>> {
    let user = User::find_by_id(user_id, &state.deps.db_pool)
        .await?
        .map(|u| u.to_public());
    Ok(Json(json!({ "success": true, "user": user })))
}

pub async fn user_posts_handler(
    Extension(state): Extension<AxumAppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<PageQuery>,
    auth: Option<AuthUser>,
) -> AppResult<Json<serde_json::Value>> {
    let viewer = auth.map(|a| a.user_id);
    let page = list_user_posts(user_id, &query, viewer, &state.deps.db_pool).await?;
    Ok(Json(json!({ "success": true, "posts": page })))
}
