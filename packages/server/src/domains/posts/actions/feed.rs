//! Feed listing and post detail assembly.

use serde::Serialize;
use sqlx::PgPool;

use crate::common::{paginate, AppError, AppResult, Page, PageQuery, PostId, UserId};
use crate::domains::posts::actions::views::{
    build_comment_views, build_post_views, CommentView, PostView,
};
use crate::domains::posts::models::{Comment, Post};

const DEFAULT_PAGE: i64 = 20;
const MAX_PAGE: i64 = 50;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostView,
    pub comments: Vec<CommentView>,
}

/// Global feed, newest first.
pub async fn list_feed(
    query: &PageQuery,
    viewer: Option<UserId>,
    pool: &PgPool,
) -> AppResult<Page<PostView>> {
    list_posts(query, viewer, None, pool).await
}

/// One author's posts, newest first.
pub async fn list_user_posts(
    author: UserId,
    query: &PageQuery,
    viewer: Option<UserId>,
    pool: &PgPool,
) -> AppResult<Page<PostView>> {
    list_posts(query, viewer, Some(author), pool).await
}

async fn list_posts(
    query: &PageQuery,
    viewer: Option<UserId>,
    author: Option<UserId>,
    pool: &PgPool,
) -> AppResult<Page<PostView>> {
    let limit = query.limit_or(DEFAULT_PAGE, MAX_PAGE);
    let rows = Post::list(limit + 1, query.cursor, author, pool).await?;
    let (rows, next_cursor) = paginate(rows, limit, |post| post.id.as_i64());
    let items = build_post_views(rows, viewer, pool).await?;
    Ok(Page { items, next_cursor })
}

/// Post with its full comment thread.
pub async fn post_detail(
    post_id: PostId,
    viewer: Option<UserId>,
    pool: &PgPool,
) -> AppResult<PostDetail> {
    let post = Post::find_by_id(post_id, pool)
        .await?
        .ok_or(AppError::NotFound)?;
    let views = build_post_views(vec![post], viewer, pool).await?;
    let post = views
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("post view assembly returned nothing")))?;

    let comments = Comment::list_by_post(post_id, pool).await?;
    let comments = build_comment_views(comments, pool).await?;

    Ok(PostDetail { post, comments })
}
