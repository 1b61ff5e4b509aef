//! Phone login end to end: code issuance, rate limits, verification and
//! session establishment.

mod common;

use common::TestHarness;
use test_context::test_context;

use server_core::common::AppError;
use server_core::domains::auth::actions::{send_code, verify_code};
use server_core::domains::auth::models::SmsCode;

#[test_context(TestHarness)]
#[tokio::test]
async fn full_login_flow(ctx: &TestHarness) {
    let phone = "13800138000";

    // Issue a code; delivery goes through the SMS collaborator.
    let sent = send_code(phone, &ctx.deps).await.expect("send code");
    assert_eq!(sent.ttl, 300);
    let code = ctx.sms.last_code_for(phone).expect("code delivered");
    assert_eq!(code.len(), 6);

    // An immediate second request is throttled and records nothing.
    let err = send_code(phone, &ctx.deps).await.unwrap_err();
    assert!(matches!(err, AppError::RateLimited(_)));
    assert_eq!(SmsCode::count_for_phone(phone, &ctx.db_pool).await.unwrap(), 1);

    // A wrong code does not consume the record.
    let err = verify_code(phone, "000001", &ctx.deps).await.unwrap_err();
    assert!(matches!(err, AppError::AuthFailed(_)));

    // The right code logs in and auto-registers.
    let login = verify_code(phone, &code, &ctx.deps).await.expect("login");
    assert!(!login.token.is_empty());
    assert_eq!(login.user.phone.as_deref(), Some(phone));
    assert!(!login.user.is_verified);
    assert_eq!(login.user.gender, 0);
    assert_eq!(login.user.nickname, "手机用户8000");

    let claims = ctx.jwt_service.verify_token(&login.token).expect("claims");
    assert_eq!(claims.user_id, login.user.id.as_i64());
    assert_eq!(claims.open_id, format!("phone:{}", phone));
    assert_eq!(claims.role, "user");

    // Replaying the consumed code fails.
    let err = verify_code(phone, &code, &ctx.deps).await.unwrap_err();
    assert!(matches!(err, AppError::AuthFailed(_)));

    // A later login for the same phone reuses the same account.
    ctx.seed_code(phone, "654321", 90).await;
    let second = verify_code(phone, "654321", &ctx.deps).await.expect("login");
    assert_eq!(second.user.id, login.user.id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn invalid_phone_rejected_before_storage(ctx: &TestHarness) {
    for phone in ["2380013800a", "1380013800", "+8613800138001"] {
        let err = send_code(phone, &ctx.deps).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
    assert!(ctx.sms.sent_codes().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn hourly_cap_applies(ctx: &TestHarness) {
    let phone = "13800138002";
    // Ten codes already issued this hour, all older than the 60s window.
    for i in 0..10 {
        ctx.seed_code(phone, &format!("{:06}", i), 120 + i * 60).await;
    }

    let err = send_code(phone, &ctx.deps).await.unwrap_err();
    match err {
        AppError::RateLimited(message) => assert_eq!(message, "发送次数过多，请明天再试"),
        other => panic!("expected hourly rate limit, got {:?}", other),
    }
    assert_eq!(
        SmsCode::count_for_phone(phone, &ctx.db_pool).await.unwrap(),
        10
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn expired_code_fails(ctx: &TestHarness) {
    let phone = "13800138003";
    // Created six minutes ago, so it expired a minute ago.
    ctx.seed_code(phone, "111111", 360).await;

    let err = verify_code(phone, "111111", &ctx.deps).await.unwrap_err();
    assert!(matches!(err, AppError::AuthFailed(_)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn only_latest_code_matches(ctx: &TestHarness) {
    let phone = "13800138004";
    ctx.seed_code(phone, "111111", 120).await;
    ctx.seed_code(phone, "222222", 61).await;

    // The older record is still unexpired and unused, but dead.
    let err = verify_code(phone, "111111", &ctx.deps).await.unwrap_err();
    assert!(matches!(err, AppError::AuthFailed(_)));

    verify_code(phone, "222222", &ctx.deps).await.expect("latest code works");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn delivery_failure_keeps_code_valid(ctx: &TestHarness) {
    let phone = "13800138005";
    ctx.sms
        .fail_next
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let sent = send_code(phone, &ctx.deps).await.expect("still succeeds");
    assert_eq!(sent.ttl, 300);

    // Nothing was delivered, but the record exists and can be consumed.
    assert!(ctx.sms.last_code_for(phone).is_none());
    let record = SmsCode::find_latest(phone, &ctx.db_pool)
        .await
        .unwrap()
        .expect("record kept");
    assert!(!record.used);
    verify_code(phone, &record.code, &ctx.deps).await.expect("code valid");
}
