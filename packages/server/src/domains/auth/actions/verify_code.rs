//! Verify code action: code check plus session issuance.

use anyhow::anyhow;
use tracing::info;

use crate::common::validation::{validate_phone, validate_sms_code};
use crate::common::{AppError, AppResult};
use crate::domains::auth::models::SmsCode;
use crate::domains::users::models::{Profile, User};
use crate::kernel::ServerDeps;

/// A verified login: the session token and the user it belongs to.
#[derive(Debug)]
pub struct VerifiedLogin {
    pub token: String,
    pub user: Profile,
}

/// Check a submitted code and establish a session.
///
/// First-time phones are auto-registered. The insert uses ON CONFLICT DO
/// NOTHING and the canonical row is re-fetched afterwards, so the loser of a
/// concurrent first-login race lands on the same account.
pub async fn verify_code(phone: &str, code: &str, deps: &ServerDeps) -> AppResult<VerifiedLogin> {
    validate_phone(phone)?;
    validate_sms_code(code)?;

    if !SmsCode::consume(phone, code, &deps.db_pool).await? {
        return Err(AppError::AuthFailed("验证码错误或已过期".to_string()));
    }

    let user = match User::find_by_phone(phone, &deps.db_pool).await? {
        Some(user) => user,
        None => {
            User::create_phone_user(phone, &deps.db_pool).await?;
            User::find_by_phone(phone, &deps.db_pool)
                .await?
                .ok_or_else(|| anyhow!("user row missing after auto-registration"))?
        }
    };

    User::touch_last_signed_in(user.id, &deps.db_pool).await?;

    let token = deps.jwt_service.create_token(
        user.id,
        user.open_id.clone(),
        user.display_name(),
        user.role.clone(),
    )?;

    info!(user_id = %user.id, "phone login verified");
    Ok(VerifiedLogin {
        token,
        user: user.to_profile(),
    })
}
