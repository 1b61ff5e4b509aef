//! Session endpoints: current user and logout.

use axum::{extract::Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::common::AppResult;
use crate::domains::auth::clear_session_cookie;
use crate::domains::users::models::User;
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;

/// The current user's private profile, or null without a valid session.
pub async fn me_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<AuthUser>,
) -> AppResult<Json<serde_json::Value>> {
    let user = match auth {
        Some(auth) => User::find_by_id(auth.user_id, &state.deps.db_pool)
            .await?
            .map(|u| u.to_profile()),
        None => None,
    };
    Ok(Json(json!({ "success": true, "user": user })))
}

pub async fn logout_handler(
    Extension(state): Extension<AxumAppState>,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    let jar = jar.add(clear_session_cookie(state.cookie_secure));
    (jar, Json(json!({ "success": true })))
}
