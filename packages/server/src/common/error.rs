//! Application error taxonomy.
//!
//! Every failure path surfaces to the caller synchronously as a structured
//! `{success: false, message}` body; only truly unexpected errors collapse to
//! a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input, rejected before any side effect.
    #[error("{0}")]
    Validation(String),

    /// Throttled, no side effect.
    #[error("{0}")]
    RateLimited(String),

    /// No session or invalid/expired token.
    #[error("请先登录")]
    AuthRequired,

    /// Code/session lookup miss - an authentication failure, not a fault.
    #[error("{0}")]
    AuthFailed(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("资源不存在")]
    NotFound,

    /// e.g. phone already bound to a different account.
    #[error("{0}")]
    Conflict(String),

    /// SMS / identity-verification call failed; surfaced with a generic
    /// message, local state is not rolled back.
    #[error("{0}")]
    ExternalService(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::AuthRequired | AppError::AuthFailed(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                "服务器内部错误".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                "服务器内部错误".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "message": self.public_message(),
        });
        (self.status(), Json(body)).into_response()
    }
}

impl From<aliyun::AliyunError> for AppError {
    fn from(e: aliyun::AliyunError) -> Self {
        tracing::error!(error = %e, "aliyun call failed");
        AppError::ExternalService("外部服务暂时不可用，请稍后重试".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::RateLimited("x".into()).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(AppError::AuthRequired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Conflict("x".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::ExternalService("x".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::Internal(anyhow::anyhow!("secret connection string"));
        assert_eq!(err.public_message(), "服务器内部错误");
    }
}
