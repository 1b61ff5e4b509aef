//! Open an identity-verification order.

use chrono::Utc;
use tracing::info;

use crate::common::validation::{validate_id_number, validate_real_name};
use crate::common::{AppError, AppResult, UserId};
use crate::domains::users::models::User;
use crate::kernel::{InitVerifyParams, ServerDeps};

/// Result of opening a verification order: the provider's id plus the URL
/// where the user completes the liveness capture out-of-band.
#[derive(Debug)]
pub struct VerifyInitiated {
    pub certify_id: String,
    pub certify_url: String,
}

/// Start the verification flow for a user.
///
/// Verification is terminal: an already-verified user gets a hard error.
/// Repeated attempts before passing are allowed; each gets a fresh order
/// reference and creates no local state.
pub async fn init_verify(
    user_id: UserId,
    real_name: &str,
    id_number: &str,
    meta_info: &str,
    deps: &ServerDeps,
) -> AppResult<VerifyInitiated> {
    validate_real_name(real_name)?;
    validate_id_number(id_number)?;

    let user = User::find_by_id(user_id, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound)?;
    if user.is_verified {
        return Err(AppError::Conflict("您已完成认证".to_string()));
    }

    let outer_order_no = format!("V_{}_{}", user_id, Utc::now().timestamp_millis());
    let certify_id = deps
        .identity
        .init_verify(InitVerifyParams {
            outer_order_no,
            cert_name: real_name.to_string(),
            cert_no: id_number.to_string(),
            meta_info: meta_info.to_string(),
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "InitSmartVerify failed");
            AppError::ExternalService("认证服务暂时不可用，请稍后重试".to_string())
        })?;

    info!(user_id = %user_id, certify_id = %certify_id, "verification order opened");
    Ok(VerifyInitiated {
        certify_url: format!("https://v.rpns8.com/u/{}", certify_id),
        certify_id,
    })
}
