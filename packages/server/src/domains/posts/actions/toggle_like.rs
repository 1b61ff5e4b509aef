//! Like/unlike toggle.

use sqlx::PgPool;

use crate::common::{AppError, AppResult, PostId, UserId};
use crate::domains::posts::models::{Like, Post};

/// Flip the caller's like on a post. Returns the resulting state.
pub async fn toggle_like(user_id: UserId, post_id: PostId, pool: &PgPool) -> AppResult<bool> {
    if Post::find_by_id(post_id, pool).await?.is_none() {
        return Err(AppError::NotFound);
    }
    let is_liked = Like::toggle(user_id, post_id, pool).await?;
    Ok(is_liked)
}
