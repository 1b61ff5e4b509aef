//! Delete a post, owner only.

use sqlx::PgPool;
use tracing::info;

use crate::common::{AppError, AppResult, PostId, UserId};
use crate::domains::posts::models::Post;

pub async fn delete_post(user_id: UserId, post_id: PostId, pool: &PgPool) -> AppResult<()> {
    let post = Post::find_by_id(post_id, pool)
        .await?
        .ok_or(AppError::NotFound)?;
    if post.user_id != user_id {
        return Err(AppError::Forbidden("无权删除".to_string()));
    }

    Post::delete(post_id, pool).await?;
    info!(user_id = %user_id, post_id = %post_id, "post deleted");
    Ok(())
}
