use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::{middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::common::{AppError, UserId};
use crate::domains::auth::{JwtService, SESSION_COOKIE};

/// Authenticated user information from the session token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: UserId,
    pub open_id: String,
    pub nickname: String,
    pub role: String,
}

/// JWT authentication middleware
///
/// Verifies the session cookie or Authorization header and adds AuthUser to
/// request extensions. Without a valid token the request continues
/// unauthenticated (public access); protected handlers reject it themselves.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth_user = extract_auth_user(&request, &jwt_service);

    if let Some(user) = auth_user {
        debug!(user_id = %user.user_id, "authenticated request");
        request.extensions_mut().insert(user);
    } else {
        debug!("no valid session token");
    }

    next.run(request).await
}

/// Extract and verify the session token from a request.
///
/// The cookie is the primary channel; the Authorization header (with or
/// without a "Bearer " prefix) serves API clients.
fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<AuthUser> {
    let token = session_token(request)?;
    let claims = jwt_service.verify_token(&token).ok()?;

    Some(AuthUser {
        user_id: UserId::from_i64(claims.user_id),
        open_id: claims.open_id,
        nickname: claims.nickname,
        role: claims.role,
    })
}

fn session_token(request: &axum::http::Request<axum::body::Body>) -> Option<String> {
    let jar = CookieJar::from_headers(request.headers());
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    let auth_str = request.headers().get("authorization")?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);
    Some(token.to_string())
}

/// Handlers take `AuthUser` for protected routes and `Option<AuthUser>` for
/// public routes that personalize when a session is present.
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::AuthRequired)
    }
}
