use std::collections::{HashMap, HashSet};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::{PostId, UserId};
use crate::domains::posts::models::{Comment, Like, Post};
use crate::domains::users::models::{PublicUser, User};

/// A post as rendered in the feed, with its author and the caller's like state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: PostId,
    pub content: String,
    pub images: Vec<String>,
    pub like_count: i32,
    pub comment_count: i32,
    pub created_at: DateTime<Utc>,
    pub user: PublicUser,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user: PublicUser,
    pub parent_id: Option<i64>,
    pub reply_to_user: Option<PublicUser>,
}

/// Resolve public profiles for a set of user ids. Missing rows (deleted
/// accounts) get a placeholder so views never fail to render.
pub async fn resolve_users(
    ids: &HashSet<UserId>,
    pool: &PgPool,
) -> Result<HashMap<UserId, PublicUser>> {
    let ids: Vec<UserId> = ids.iter().copied().collect();
    let users = User::find_many(&ids, pool).await?;
    let mut map: HashMap<UserId, PublicUser> = users
        .into_iter()
        .map(|u| (u.id, u.to_public()))
        .collect();
    for id in ids {
        map.entry(id).or_insert_with(|| User::public_placeholder(id));
    }
    Ok(map)
}

/// Assemble `PostView`s for a page of posts, batching the author and
/// like-state lookups.
pub async fn build_post_views(
    posts: Vec<Post>,
    viewer: Option<UserId>,
    pool: &PgPool,
) -> Result<Vec<PostView>> {
    let author_ids: HashSet<UserId> = posts.iter().map(|p| p.user_id).collect();
    let users = resolve_users(&author_ids, pool).await?;

    let post_ids: Vec<PostId> = posts.iter().map(|p| p.id).collect();
    let liked: HashSet<PostId> = match viewer {
        Some(user_id) => Like::liked_post_ids(user_id, &post_ids, pool)
            .await?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    let views = posts
        .into_iter()
        .map(|post| {
            let user = users
                .get(&post.user_id)
                .cloned()
                .unwrap_or_else(|| User::public_placeholder(post.user_id));
            PostView {
                id: post.id,
                content: post.content.clone(),
                images: post.image_list(),
                like_count: post.like_count,
                comment_count: post.comment_count,
                created_at: post.created_at,
                user,
                is_liked: liked.contains(&post.id),
            }
        })
        .collect();
    Ok(views)
}

pub async fn build_comment_views(comments: Vec<Comment>, pool: &PgPool) -> Result<Vec<CommentView>> {
    let mut ids: HashSet<UserId> = comments.iter().map(|c| c.user_id).collect();
    for c in &comments {
        if let Some(reply_to) = c.reply_to_user_id {
            ids.insert(UserId::from(reply_to));
        }
    }
    let users = resolve_users(&ids, pool).await?;

    let views = comments
        .into_iter()
        .map(|c| {
            let user = users
                .get(&c.user_id)
                .cloned()
                .unwrap_or_else(|| User::public_placeholder(c.user_id));
            let reply_to_user = c
                .reply_to_user_id
                .map(UserId::from)
                .and_then(|id| users.get(&id).cloned());
            CommentView {
                id: c.id.into(),
                content: c.content,
                created_at: c.created_at,
                user,
                parent_id: c.parent_id,
                reply_to_user,
            }
        })
        .collect();
    Ok(views)
}
