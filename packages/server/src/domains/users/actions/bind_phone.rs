//! Bind a phone number to an existing account.

use sqlx::PgPool;
use tracing::info;

use crate::common::{AppError, AppResult, UserId};
use crate::common::validation::{validate_phone, validate_sms_code};
use crate::domains::auth::models::SmsCode;
use crate::domains::users::models::User;

/// Verify an SMS code and bind the phone to `user_id`.
///
/// Rejects when the phone is already bound to a different account; the code
/// is consumed either way once it matched.
pub async fn bind_phone(
    user_id: UserId,
    phone: &str,
    code: &str,
    pool: &PgPool,
) -> AppResult<()> {
    validate_phone(phone)?;
    validate_sms_code(code)?;

    if !SmsCode::consume(phone, code, pool).await? {
        return Err(AppError::AuthFailed("验证码无效或已过期".to_string()));
    }

    if let Some(existing) = User::find_by_phone(phone, pool).await? {
        if existing.id != user_id {
            return Err(AppError::Conflict("该手机号已被其他账号绑定".to_string()));
        }
        // Already bound to this very account; nothing to do.
        return Ok(());
    }

    User::update_phone(user_id, phone, pool).await?;
    info!(user_id = %user_id, "phone bound");
    Ok(())
}
