//! Where a session token can come from on an inbound request.
//!
//! The route guard only looks at the cookie and the `Authorization` header.
//! The page resolver additionally accepts the token the guard forwards in
//! `x-auth-token`. Empty values count as absent.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum_extra::extract::cookie::CookieJar;

/// Cookie mirrored by the client store and read by the server.
pub const AUTH_COOKIE: &str = "auth-token";
/// Token echo stamped by the route guard.
pub const FORWARDED_TOKEN_HEADER: &str = "x-auth-token";
/// Advisory authentication flag stamped by the route guard.
pub const AUTHENTICATED_HEADER: &str = "x-authenticated";

#[must_use]
pub fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(AUTH_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

#[must_use]
pub fn forwarded_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FORWARDED_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Token candidate for the route guard: cookie, then bearer header.
#[must_use]
pub fn guard_token(headers: &HeaderMap) -> Option<String> {
    cookie_token(headers).or_else(|| bearer_token(headers))
}

/// Token candidate for page rendering: cookie, bearer header, then the
/// guard-forwarded header.
#[must_use]
pub fn page_token(headers: &HeaderMap) -> Option<String> {
    guard_token(headers).or_else(|| forwarded_token(headers))
}

#[cfg(test)]
#[path = "headers_test.rs"]
mod tests;
