//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use aliyun::{AliyunOptions, CloudAuthClient, OssClient, SmsClient};

use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::kernel::{CloudAuthAdapter, DysmsAdapter, OssAdapter, ServerDeps};
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    bind_phone_handler, check_result_handler, create_comment_handler, create_group_handler,
    create_post_handler, delete_post_handler, health_handler, init_verify_handler,
    list_conversations_handler, list_messages_handler, list_posts_handler, logout_handler,
    me_handler, post_detail_handler, presign_handler, profile_handler, public_user_handler,
    search_handler, send_code_handler, send_message_handler, start_private_chat_handler,
    toggle_like_handler, update_profile_handler, upload_image_handler, user_posts_handler,
    verify_code_handler, verify_status_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: ServerDeps,
    pub cookie_secure: bool,
}

/// Assemble the API router around an existing state.
///
/// Shared between production startup and the integration-test harness, which
/// injects stub collaborators through `ServerDeps`.
pub fn build_router(state: AxumAppState, allowed_origins: &[String]) -> Router {
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .allow_credentials(true)
    };

    let jwt_service_for_middleware = state.deps.jwt_service.clone();

    let api = Router::new()
        .route("/sms/send-code", post(send_code_handler))
        .route("/sms/verify-code", post(verify_code_handler))
        .route("/auth/me", get(me_handler))
        .route("/auth/logout", post(logout_handler))
        .route(
            "/users/profile",
            get(profile_handler).patch(update_profile_handler),
        )
        .route("/users/bind-phone", post(bind_phone_handler))
        .route("/users/:id", get(public_user_handler))
        .route("/users/:id/posts", get(user_posts_handler))
        .route("/verify/init", post(init_verify_handler))
        .route("/verify/check-result", post(check_result_handler))
        .route("/verify/status", get(verify_status_handler))
        .route("/posts", get(list_posts_handler).post(create_post_handler))
        .route(
            "/posts/:id",
            get(post_detail_handler).delete(delete_post_handler),
        )
        .route("/posts/:id/like", post(toggle_like_handler))
        .route("/posts/:id/comments", post(create_comment_handler))
        .route("/conversations", get(list_conversations_handler))
        .route("/conversations/private", post(start_private_chat_handler))
        .route("/conversations/group", post(create_group_handler))
        .route(
            "/conversations/:id/messages",
            get(list_messages_handler).post(send_message_handler),
        )
        .route("/search", get(search_handler))
        .route("/uploads/image", post(upload_image_handler))
        .route("/uploads/presign", post(presign_handler));

    Router::new()
        .nest("/api", api)
        // Health check (public, unauthenticated)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        }))
        .layer(Extension(state))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(30)))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Build the production application: construct the Aliyun collaborators,
/// wire up `ServerDeps` and attach the per-IP rate limiter.
pub fn build_app(pool: PgPool, config: &Config) -> Router {
    let sms_client = SmsClient::new(AliyunOptions {
        access_key_id: config.sms_access_key_id.clone(),
        access_key_secret: config.sms_access_key_secret.clone(),
    });
    let cloudauth_client = CloudAuthClient::new(AliyunOptions {
        access_key_id: config.aliyun_access_key.clone(),
        access_key_secret: config.aliyun_access_secret.clone(),
    });
    let oss_client = OssClient::new(
        AliyunOptions {
            access_key_id: config.oss_access_key_id.clone(),
            access_key_secret: config.oss_access_key_secret.clone(),
        },
        config.oss_region.clone(),
        config.oss_bucket.clone(),
    );

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));

    let deps = ServerDeps::new(
        pool,
        Arc::new(DysmsAdapter::new(
            sms_client,
            config.sms_sign_name.clone(),
            config.sms_template_code.clone(),
        )),
        Arc::new(CloudAuthAdapter::new(
            cloudauth_client,
            config.aliyun_scene_id,
            config.verify_return_url.clone(),
        )),
        Arc::new(OssAdapter(oss_client)),
        jwt_service,
    );

    let state = AxumAppState {
        deps,
        cookie_secure: config.cookie_secure,
    };

    // Per-IP rate limiting: 10 req/sec with bursts up to 20
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .use_headers()
            .finish()
            .expect("Rate limiter configuration is valid and should never fail"),
    );
    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    build_router(state, &config.allowed_origins).layer(rate_limit_layer)
}
