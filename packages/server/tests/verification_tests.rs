//! Identity verification workflow: init, result polling and gender sync.

mod common;

use common::TestHarness;
use test_context::test_context;

use server_core::common::AppError;
use server_core::domains::verification::actions::{check_result, init_verify, CheckOutcome};

const MALE_ID: &str = "110101199003071234"; // sequence digit 3, odd
const FEMALE_ID: &str = "110101199003071244"; // sequence digit 4, even

#[test_context(TestHarness)]
#[tokio::test]
async fn init_opens_an_order(ctx: &TestHarness) {
    let user = ctx.create_user("13800139000").await;

    let initiated = init_verify(user.id, "张三", MALE_ID, "meta-blob", &ctx.deps)
        .await
        .expect("init");
    assert_eq!(initiated.certify_id, "certify-test");
    assert_eq!(initiated.certify_url, "https://v.rpns8.com/u/certify-test");

    let calls = ctx.identity.init_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].cert_name, "张三");
    assert_eq!(calls[0].cert_no, MALE_ID);
    assert_eq!(calls[0].meta_info, "meta-blob");
    assert!(calls[0]
        .outer_order_no
        .starts_with(&format!("V_{}_", user.id)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn init_rejects_bad_input(ctx: &TestHarness) {
    let user = ctx.create_user("13800139001").await;

    let err = init_verify(user.id, "张", MALE_ID, "m", &ctx.deps).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = init_verify(user.id, "张三", "12345", "m", &ctx.deps).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Input rejection happens before the external call.
    assert!(ctx.identity.init_calls.lock().unwrap().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn passed_check_syncs_gender(ctx: &TestHarness) {
    let user = ctx.create_user("13800139002").await;

    let outcome = check_result(user.id, "certify-test", MALE_ID, &ctx.deps)
        .await
        .expect("check");
    assert_eq!(outcome, CheckOutcome::Passed { gender: 1 });

    let user = ctx.fetch_user(user.id).await;
    assert!(user.is_verified);
    assert_eq!(user.gender, 1);
    assert!(user.verified_at.is_some());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn even_sequence_digit_is_female(ctx: &TestHarness) {
    let user = ctx.create_user("13800139003").await;

    let outcome = check_result(user.id, "certify-test", FEMALE_ID, &ctx.deps)
        .await
        .expect("check");
    assert_eq!(outcome, CheckOutcome::Passed { gender: 2 });
    assert_eq!(ctx.fetch_user(user.id).await.gender, 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn failed_check_mutates_nothing(ctx: &TestHarness) {
    let user = ctx.create_user("13800139004").await;
    ctx.identity
        .passed
        .store(false, std::sync::atomic::Ordering::SeqCst);

    let outcome = check_result(user.id, "certify-test", MALE_ID, &ctx.deps)
        .await
        .expect("check");
    assert_eq!(outcome, CheckOutcome::NotPassed);

    let user = ctx.fetch_user(user.id).await;
    assert!(!user.is_verified);
    assert_eq!(user.gender, 0);

    // A retry of init is allowed after a failed check.
    init_verify(user.id, "张三", MALE_ID, "m", &ctx.deps)
        .await
        .expect("retry init");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn verification_is_terminal(ctx: &TestHarness) {
    let user = ctx.create_verified_user("13800139005", 1).await;

    let err = init_verify(user.id, "张三", MALE_ID, "m", &ctx.deps).await.unwrap_err();
    match err {
        AppError::Conflict(message) => assert_eq!(message, "您已完成认证"),
        other => panic!("expected conflict, got {:?}", other),
    }
}
