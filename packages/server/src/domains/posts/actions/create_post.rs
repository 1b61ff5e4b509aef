//! Publish a new post.

use tracing::info;

use crate::common::validation::validate_length;
use crate::common::{AppError, AppResult, PostId, UserId};
use crate::domains::posts::models::Post;
use crate::domains::users::models::User;
use crate::kernel::ServerDeps;

pub const MAX_IMAGES: usize = 9;

/// Publishing requires a completed identity verification; the distinct
/// outcome lets the handler tell the client to open the verify flow.
#[derive(Debug)]
pub enum CreatePostOutcome {
    Created(PostId),
    NeedVerify,
}

pub async fn create_post(
    user_id: UserId,
    content: &str,
    images: &[String],
    deps: &ServerDeps,
) -> AppResult<CreatePostOutcome> {
    validate_length(content, 1, 2000, "内容")?;
    if images.len() > MAX_IMAGES {
        return Err(AppError::Validation("最多上传9张图片".to_string()));
    }

    let user = User::find_by_id(user_id, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound)?;
    if !user.is_verified {
        return Ok(CreatePostOutcome::NeedVerify);
    }

    let id = Post::insert(user_id, content, images, &deps.db_pool).await?;
    info!(user_id = %user_id, post_id = %id, "post created");
    Ok(CreatePostOutcome::Created(id))
}
