//! Edit the caller's profile.

use sqlx::PgPool;

use crate::common::validation::validate_length;
use crate::common::{AppError, AppResult, UserId};
use crate::domains::users::models::{Profile, User};

/// Update nickname/avatar/bio; omitted fields keep their value. Verification
/// state (`gender`, `is_verified`) is not reachable from here.
pub async fn update_profile(
    user_id: UserId,
    nickname: Option<&str>,
    avatar: Option<&str>,
    bio: Option<&str>,
    pool: &PgPool,
) -> AppResult<Profile> {
    if let Some(nickname) = nickname {
        validate_length(nickname, 1, 50, "昵称")?;
    }
    if let Some(bio) = bio {
        validate_length(bio, 0, 200, "简介")?;
    }

    User::update_profile(user_id, nickname, avatar, bio, pool).await?;
    let user = User::find_by_id(user_id, pool)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(user.to_profile())
}
