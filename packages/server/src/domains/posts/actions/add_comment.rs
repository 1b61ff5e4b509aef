//! Comment on a post.

use sqlx::PgPool;

use crate::common::validation::validate_length;
use crate::common::{AppError, AppResult, CommentId, PostId, UserId};
use crate::domains::posts::models::{Comment, Post};

pub async fn add_comment(
    user_id: UserId,
    post_id: PostId,
    content: &str,
    parent_id: Option<i64>,
    reply_to_user_id: Option<i64>,
    pool: &PgPool,
) -> AppResult<CommentId> {
    validate_length(content, 1, 500, "评论")?;
    if Post::find_by_id(post_id, pool).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let id = Comment::insert(post_id, user_id, content, parent_id, reply_to_user_id, pool).await?;
    Ok(id)
}
