//! SMS code endpoints: issue a code, verify it and establish a session.

use axum::{extract::Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::common::AppResult;
use crate::domains::auth::actions::{send_code, verify_code};
use crate::domains::auth::session_cookie;
use crate::server::app::AxumAppState;

#[derive(Deserialize)]
pub struct SendCodeRequest {
    pub phone: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub phone: String,
    pub code: String,
}

pub async fn send_code_handler(
    Extension(state): Extension<AxumAppState>,
    Json(body): Json<SendCodeRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let sent = send_code(&body.phone, &state.deps).await?;
    Ok(Json(json!({ "success": true, "ttl": sent.ttl })))
}

/// Successful verification sets the session cookie and returns the token in
/// the body as well, for clients that prefer the Authorization header.
pub async fn verify_code_handler(
    Extension(state): Extension<AxumAppState>,
    jar: CookieJar,
    Json(body): Json<VerifyCodeRequest>,
) -> AppResult<(CookieJar, Json<serde_json::Value>)> {
    let login = verify_code(&body.phone, &body.code, &state.deps).await?;
    let jar = jar.add(session_cookie(login.token.clone(), state.cookie_secure));
    Ok((
        jar,
        Json(json!({
            "success": true,
            "token": login.token,
            "user": login.user,
        })),
    ))
}
