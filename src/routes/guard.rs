//! Route guard middleware.
//!
//! ARCHITECTURE
//! ============
//! Runs once per navigation before any page handler. It reads the token from
//! the `auth-token` cookie or an `Authorization: Bearer` header, verifies it,
//! and either redirects or passes the request through. A missing token and a
//! rejected one are treated the same way.
//!
//! On pass-through it stamps `x-authenticated` / `x-auth-token` on the
//! response, and forwards them on the inner request. Those headers are hints:
//! page handlers re-verify through [`crate::auth::resolver`].

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::auth::headers::{AUTHENTICATED_HEADER, FORWARDED_TOKEN_HEADER, guard_token};
use crate::auth::{DASHBOARD_PATH, LOGIN_PATH, login_redirect};
use crate::state::AppState;

/// Pages that require a signed-in user (and everything beneath them).
const PROTECTED_ROUTES: &[&str] = &[DASHBOARD_PATH];
/// Pages a signed-in user has no business seeing.
const AUTH_ROUTES: &[&str] = &[LOGIN_PATH, "/register"];
/// Namespaces the guard never evaluates: API, static assets, favicon.
const EXCLUDED_PREFIXES: &[&str] = &["/api", "/pkg", "/static", "/favicon.ico"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Excluded,
    Protected,
    AuthOnly,
    Root,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Redirect(String),
    PassThrough,
}

/// `route` itself or anything below it, but not a sibling sharing its prefix.
fn under(path: &str, route: &str) -> bool {
    path.strip_prefix(route)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[must_use]
pub fn classify(path: &str) -> PathClass {
    if EXCLUDED_PREFIXES.iter().any(|prefix| under(path, prefix)) {
        PathClass::Excluded
    } else if PROTECTED_ROUTES.iter().any(|route| under(path, route)) {
        PathClass::Protected
    } else if AUTH_ROUTES.iter().any(|route| under(path, route)) {
        PathClass::AuthOnly
    } else if path == "/" {
        PathClass::Root
    } else {
        PathClass::Neutral
    }
}

#[must_use]
pub fn decide(class: PathClass, path: &str, authenticated: bool) -> GuardDecision {
    match (class, authenticated) {
        (PathClass::Protected, false) => GuardDecision::Redirect(login_redirect(path)),
        (PathClass::AuthOnly | PathClass::Root, true) => GuardDecision::Redirect(DASHBOARD_PATH.to_owned()),
        _ => GuardDecision::PassThrough,
    }
}

/// Stamp the advisory trust headers.
fn stamp(headers: &mut HeaderMap, authenticated: bool, token: Option<&HeaderValue>) {
    headers.insert(AUTHENTICATED_HEADER, HeaderValue::from_static(if authenticated { "true" } else { "false" }));
    match token {
        Some(value) => {
            headers.insert(FORWARDED_TOKEN_HEADER, value.clone());
        }
        None => {
            headers.remove(FORWARDED_TOKEN_HEADER);
        }
    }
}

/// Axum middleware; install with `middleware::from_fn_with_state`.
pub async fn route_guard(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let class = classify(&path);
    if class == PathClass::Excluded {
        return next.run(req).await;
    }

    let token = guard_token(req.headers());
    let authenticated = match token.as_deref().map(|t| state.codec.verify(t)) {
        Some(Ok(_)) => true,
        Some(Err(reason)) => {
            tracing::debug!(%reason, %path, "guard rejected token");
            false
        }
        None => false,
    };

    if let GuardDecision::Redirect(target) = decide(class, &path, authenticated) {
        tracing::debug!(%path, %target, authenticated, "guard redirect");
        return Redirect::temporary(&target).into_response();
    }

    // A token that cannot be a header value is not echoed.
    let token_header = token.as_deref().and_then(|t| HeaderValue::from_str(t).ok());
    stamp(req.headers_mut(), authenticated, token_header.as_ref());

    let mut response = next.run(req).await;
    stamp(response.headers_mut(), authenticated, token_header.as_ref());
    response
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
