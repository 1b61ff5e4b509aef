//! Upload endpoints.

use axum::{extract::Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::common::AppResult;
use crate::domains::uploads::{presign_upload, upload_image};
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageRequest {
    pub base64: String,
    pub file_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignRequest {
    pub file_name: String,
}

pub async fn upload_image_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Json(body): Json<UploadImageRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let uploaded = upload_image(auth.user_id, &body.base64, &body.file_name, &state.deps).await?;
    Ok(Json(json!({ "success": true, "url": uploaded.url })))
}

pub async fn presign_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
    Json(body): Json<PresignRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let presigned = presign_upload(auth.user_id, &body.file_name, &state.deps);
    Ok(Json(json!({
        "success": true,
        "uploadUrl": presigned.upload_url,
        "url": presigned.url,
        "key": presigned.key,
    })))
}
