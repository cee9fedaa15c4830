//! Shape of the mirrored `auth-token` cookie.
//!
//! The cookie is written from the client (not `HttpOnly`) so the server can
//! read the same token the client store holds.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

use super::headers::AUTH_COOKIE;

/// Lifetime of the mirrored session cookie.
pub const SESSION_COOKIE_MAX_AGE: Duration = Duration::days(7);

/// Site-wide cookie carrying `token` for seven days.
#[must_use]
pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token.to_owned()))
        .path("/")
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(SESSION_COOKIE_MAX_AGE)
        .build()
}

/// Already-expired cookie that makes the browser drop `auth-token` at once.
#[must_use]
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, ""))
        .path("/")
        .same_site(SameSite::Strict)
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// True when `cookie` removes rather than sets its value.
#[must_use]
pub fn is_removal(cookie: &Cookie<'_>) -> bool {
    cookie.max_age().is_some_and(|age| age <= Duration::ZERO)
}
