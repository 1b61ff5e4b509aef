//! Feed behaviour: verified-only publishing, like toggling, comments and
//! cursor pagination.

mod common;

use common::TestHarness;
use test_context::test_context;

use server_core::common::{AppError, PageQuery, PostId};
use server_core::domains::posts::actions::{
    add_comment, create_post, delete_post, list_feed, list_user_posts, post_detail, search,
    toggle_like, CreatePostOutcome,
};
use server_core::domains::posts::models::Post;

async fn publish(ctx: &TestHarness, user_id: server_core::common::UserId, content: &str) -> PostId {
    match create_post(user_id, content, &[], &ctx.deps).await.expect("create") {
        CreatePostOutcome::Created(id) => id,
        CreatePostOutcome::NeedVerify => panic!("author should be verified"),
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn publishing_requires_verification(ctx: &TestHarness) {
    let user = ctx.create_user("13800141000").await;

    let outcome = create_post(user.id, "第一条动态", &[], &ctx.deps).await.expect("gate");
    assert!(matches!(outcome, CreatePostOutcome::NeedVerify));

    let user = ctx.create_verified_user("13800141001", 1).await;
    let post_id = publish(ctx, user.id, "第一条动态").await;
    let post = Post::find_by_id(post_id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(post.content, "第一条动态");
    assert_eq!(post.like_count, 0);
    assert_eq!(post.comment_count, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn image_count_is_capped(ctx: &TestHarness) {
    let user = ctx.create_verified_user("13800141002", 1).await;
    let images: Vec<String> = (0..10).map(|i| format!("https://img/{i}.png")).collect();

    let err = create_post(user.id, "图太多", &images, &ctx.deps).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn like_toggle_is_symmetric(ctx: &TestHarness) {
    let author = ctx.create_verified_user("13800141003", 1).await;
    let fan = ctx.create_user("13800141004").await;
    let post_id = publish(ctx, author.id, "点赞我").await;

    assert!(toggle_like(fan.id, post_id, &ctx.db_pool).await.unwrap());
    let post = Post::find_by_id(post_id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(post.like_count, 1);

    assert!(!toggle_like(fan.id, post_id, &ctx.db_pool).await.unwrap());
    let post = Post::find_by_id(post_id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(post.like_count, 0);

    // The viewer's like state shows up in the feed.
    assert!(toggle_like(fan.id, post_id, &ctx.db_pool).await.unwrap());
    let page = list_feed(
        &PageQuery { limit: Some(50), cursor: None },
        Some(fan.id),
        &ctx.db_pool,
    )
    .await
    .unwrap();
    let view = page.items.iter().find(|p| p.id == post_id).unwrap();
    assert!(view.is_liked);
    assert_eq!(view.user.id, author.id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn comments_increment_counter_and_render_replies(ctx: &TestHarness) {
    let author = ctx.create_verified_user("13800141005", 1).await;
    let commenter = ctx.create_user("13800141006").await;
    let post_id = publish(ctx, author.id, "评论我").await;

    let top = add_comment(commenter.id, post_id, "沙发", None, None, &ctx.db_pool)
        .await
        .unwrap();
    add_comment(
        author.id,
        post_id,
        "谢谢",
        Some(top.as_i64()),
        Some(commenter.id.as_i64()),
        &ctx.db_pool,
    )
    .await
    .unwrap();

    let detail = post_detail(post_id, None, &ctx.db_pool).await.unwrap();
    assert_eq!(detail.post.comment_count, 2);
    assert_eq!(detail.comments.len(), 2);

    let reply = detail
        .comments
        .iter()
        .find(|c| c.parent_id == Some(top.as_i64()))
        .expect("reply present");
    assert_eq!(reply.reply_to_user.as_ref().unwrap().id, commenter.id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn empty_comment_rejected(ctx: &TestHarness) {
    let author = ctx.create_verified_user("13800141007", 1).await;
    let post_id = publish(ctx, author.id, "x").await;

    let err = add_comment(author.id, post_id, "", None, None, &ctx.db_pool).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deletion_is_owner_only(ctx: &TestHarness) {
    let author = ctx.create_verified_user("13800141008", 1).await;
    let stranger = ctx.create_user("13800141009").await;
    let post_id = publish(ctx, author.id, "删我试试").await;

    let err = delete_post(stranger.id, post_id, &ctx.db_pool).await.unwrap_err();
    match err {
        AppError::Forbidden(message) => assert_eq!(message, "无权删除"),
        other => panic!("expected forbidden, got {:?}", other),
    }

    delete_post(author.id, post_id, &ctx.db_pool).await.expect("owner deletes");
    assert!(Post::find_by_id(post_id, &ctx.db_pool).await.unwrap().is_none());

    let err = delete_post(author.id, post_id, &ctx.db_pool).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn cursor_pagination_walks_the_feed(ctx: &TestHarness) {
    let author = ctx.create_verified_user("13800141010", 1).await;
    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(publish(ctx, author.id, &format!("动态 {}", i)).await);
    }

    let query = PageQuery { limit: Some(2), cursor: None };
    let first = list_user_posts(author.id, &query, None, &ctx.db_pool).await.unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.items[0].id, ids[4]);
    assert_eq!(first.items[1].id, ids[3]);
    let cursor = first.next_cursor.expect("more pages");

    let query = PageQuery { limit: Some(2), cursor: Some(cursor) };
    let second = list_user_posts(author.id, &query, None, &ctx.db_pool).await.unwrap();
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.items[0].id, ids[2]);

    let query = PageQuery {
        limit: Some(2),
        cursor: second.next_cursor,
    };
    let last = list_user_posts(author.id, &query, None, &ctx.db_pool).await.unwrap();
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].id, ids[0]);
    assert!(last.next_cursor.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn search_finds_users_and_posts(ctx: &TestHarness) {
    let author = ctx.create_verified_user("13800141011", 1).await;
    server_core::domains::users::actions::update_profile(
        author.id,
        Some("晨跑达人"),
        None,
        None,
        &ctx.db_pool,
    )
    .await
    .unwrap();
    publish(ctx, author.id, "今天晨跑十公里").await;

    let results = search("晨跑", &ctx.db_pool).await.unwrap();
    assert!(results.users.iter().any(|u| u.id == author.id));
    let hit = results.posts.iter().find(|p| p.user.id == author.id).unwrap();
    assert!(hit.content.contains("晨跑"));
    assert!(!hit.is_liked);
}
