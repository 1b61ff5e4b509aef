//! Identity verification endpoints.

use axum::{extract::Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::common::{AppError, AppResult};
use crate::domains::users::models::User;
use crate::domains::verification::actions::{check_result, init_verify, CheckOutcome};
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitVerifyRequest {
    pub real_name: String,
    pub id_number: String,
    pub meta_info: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResultRequest {
    pub certify_id: String,
    pub id_number: String,
}

pub async fn init_verify_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Json(body): Json<InitVerifyRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let initiated = init_verify(
        auth.user_id,
        &body.real_name,
        &body.id_number,
        &body.meta_info,
        &state.deps,
    )
    .await?;
    Ok(Json(json!({
        "success": true,
        "certifyId": initiated.certify_id,
        "certifyUrl": initiated.certify_url,
    })))
}

pub async fn check_result_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Json(body): Json<CheckResultRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let outcome = check_result(auth.user_id, &body.certify_id, &body.id_number, &state.deps).await?;
    let body = match outcome {
        CheckOutcome::Passed { gender } => json!({ "success": true, "gender": gender }),
        CheckOutcome::NotPassed => json!({ "success": false, "message": "认证未通过" }),
    };
    Ok(Json(body))
}

pub async fn verify_status_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    let user = User::find_by_id(auth.user_id, &state.deps.db_pool)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(json!({
        "success": true,
        "isVerified": user.is_verified,
        "gender": user.gender,
        "phone": user.phone,
    })))
}
