//! Keyword search across users and posts.

use serde::Serialize;
use sqlx::PgPool;

use crate::common::validation::validate_length;
use crate::common::AppResult;
use crate::domains::posts::actions::views::{build_post_views, PostView};
use crate::domains::posts::models::Post;
use crate::domains::users::models::{PublicUser, User};

const SEARCH_LIMIT: i64 = 10;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub users: Vec<PublicUser>,
    pub posts: Vec<PostView>,
}

/// Nickname and content substring search, capped at ten hits each. Like state
/// is not resolved here; every hit renders as un-liked.
pub async fn search(keyword: &str, pool: &PgPool) -> AppResult<SearchResults> {
    validate_length(keyword, 1, 50, "关键词")?;

    let users = User::search_by_nickname(keyword, SEARCH_LIMIT, pool).await?;
    let users = users.iter().map(User::to_public).collect();

    let posts = Post::search_by_content(keyword, SEARCH_LIMIT, pool).await?;
    let posts = build_post_views(posts, None, pool).await?;

    Ok(SearchResults { users, posts })
}
