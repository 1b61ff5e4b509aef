//! Session cookie construction.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use super::jwt::SESSION_TTL_DAYS;

/// Name of the session cookie carrying the signed token.
pub const SESSION_COOKIE: &str = "cosync_session";

/// Build the session cookie with its security flags.
///
/// `secure` is driven by configuration so local development over plain HTTP
/// still works.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(SESSION_TTL_DAYS))
        .build()
}

/// Expired cookie used to clear the session on logout.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(0))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_carries_security_flags() {
        let cookie = session_cookie("token-value".to_string(), true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "token-value");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::days(SESSION_TTL_DAYS)));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn insecure_for_development() {
        let cookie = session_cookie("t".to_string(), false);
        assert_eq!(cookie.secure(), Some(false));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie(true);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::seconds(0)));
    }
}
