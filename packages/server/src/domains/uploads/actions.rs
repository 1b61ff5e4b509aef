//! Object-storage uploads.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::common::{AppError, AppResult, UserId};
use crate::kernel::ServerDeps;

/// Pre-signed PUT URLs stay valid for 15 minutes.
pub const PRESIGN_EXPIRES_SECS: u64 = 900;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Uploaded {
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    pub upload_url: String,
    pub url: String,
    pub key: String,
}

/// Object key: scoped per user, timestamped so names never collide.
fn object_key(user_id: UserId, file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let safe = if safe.is_empty() { "file".to_string() } else { safe };
    format!("uploads/{}/{}-{}", user_id, Utc::now().timestamp_millis(), safe)
}

fn content_type_for(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Decode a base64 payload and store it, returning the public URL.
pub async fn upload_image(
    user_id: UserId,
    base64_data: &str,
    file_name: &str,
    deps: &ServerDeps,
) -> AppResult<Uploaded> {
    // Clients may send a data URL; only the payload after the comma matters.
    let payload = base64_data
        .rsplit_once(',')
        .map(|(_, data)| data)
        .unwrap_or(base64_data);
    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|_| AppError::Validation("图片数据格式不正确".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("图片数据为空".to_string()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation("图片大小超出限制".to_string()));
    }

    let key = object_key(user_id, file_name);
    let url = deps
        .storage
        .put_object(&key, bytes, content_type_for(file_name))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "object upload failed");
            AppError::ExternalService("上传失败，请稍后重试".to_string())
        })?;
    info!(user_id = %user_id, key = %key, "image uploaded");
    Ok(Uploaded { url })
}

/// Hand the client a pre-signed PUT URL so large files bypass the server.
pub fn presign_upload(user_id: UserId, file_name: &str, deps: &ServerDeps) -> PresignedUpload {
    let key = object_key(user_id, file_name);
    let upload_url = deps.storage.presign_put(&key, PRESIGN_EXPIRES_SECS);
    let url = deps.storage.public_url(&key);
    PresignedUpload { upload_url, url, key }
}
