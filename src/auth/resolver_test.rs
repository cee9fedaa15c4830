use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;

use super::*;
use crate::auth::headers::{AUTHENTICATED_HEADER, FORWARDED_TOKEN_HEADER};
use crate::state::test_helpers::{
    OTHER_SECRET, TEST_SECRET, claims, mint, mint_with_secret, test_app_state, valid_token,
};

fn codec() -> TokenCodec {
    TokenCodec::new(TEST_SECRET)
}

fn with_cookie(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("cookie", HeaderValue::from_str(&format!("auth-token={token}")).unwrap());
    headers
}

// =============================================================================
// resolve
// =============================================================================

#[test]
fn resolve_builds_user_from_cookie_claims() {
    let token = valid_token();
    let auth = resolve(&codec(), &with_cookie(&token));
    assert_eq!(
        auth,
        ServerAuth {
            is_authenticated: true,
            user: Some(User { first_name: "A".into(), last_name: "B".into(), email: "a@b.com".into() }),
            token: Some(token),
            user_id: Some(7),
        }
    );
}

#[test]
fn resolve_without_token_is_unauthenticated() {
    assert_eq!(resolve(&codec(), &HeaderMap::new()), ServerAuth::unauthenticated());
}

#[test]
fn resolve_with_foreign_token_is_unauthenticated() {
    let token = mint_with_secret(&claims(7), OTHER_SECRET);
    assert_eq!(resolve(&codec(), &with_cookie(&token)), ServerAuth::unauthenticated());
}

#[test]
fn resolve_ignores_trust_header_without_token() {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHENTICATED_HEADER, HeaderValue::from_static("true"));
    assert_eq!(resolve(&codec(), &headers), ServerAuth::unauthenticated());
}

#[test]
fn resolve_reverifies_forwarded_token() {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHENTICATED_HEADER, HeaderValue::from_static("true"));
    headers.insert(FORWARDED_TOKEN_HEADER, HeaderValue::from_static("forged.token.value"));
    assert_eq!(resolve(&codec(), &headers), ServerAuth::unauthenticated());
}

#[test]
fn resolve_accepts_valid_forwarded_token() {
    let token = valid_token();
    let mut headers = HeaderMap::new();
    headers.insert(FORWARDED_TOKEN_HEADER, HeaderValue::from_str(&token).unwrap());
    let auth = resolve(&codec(), &headers);
    assert!(auth.is_authenticated);
    assert_eq!(auth.user_id, Some(7));
}

#[test]
fn resolve_prefers_cookie_even_when_cookie_is_invalid() {
    let mut headers = with_cookie("garbage");
    headers.insert("authorization", HeaderValue::from_str(&format!("Bearer {}", valid_token())).unwrap());
    assert_eq!(resolve(&codec(), &headers), ServerAuth::unauthenticated());
}

#[test]
fn missing_name_claims_become_empty_strings() {
    let mut bare = claims(11);
    bare.email = None;
    bare.first_name = None;
    bare.last_name = None;
    let auth = resolve(&codec(), &with_cookie(&mint(&bare)));
    assert_eq!(auth.user, Some(User { first_name: String::new(), last_name: String::new(), email: String::new() }));
    assert_eq!(auth.user_id, Some(11));
}

#[test]
fn server_auth_serializes_camel_case() {
    let json = serde_json::to_value(ServerAuth::unauthenticated()).unwrap();
    assert_eq!(json, serde_json::json!({ "isAuthenticated": false, "user": null, "token": null }));
}

// =============================================================================
// require_auth
// =============================================================================

#[test]
fn require_auth_returns_user_for_valid_token() {
    let token = valid_token();
    let user = require_auth(&codec(), &with_cookie(&token)).unwrap();
    assert_eq!(user.user_id, 7);
    assert_eq!(user.token, token);
    assert_eq!(user.user.email, "a@b.com");
}

#[test]
fn require_auth_fails_loudly_without_token() {
    assert_eq!(require_auth(&codec(), &HeaderMap::new()), Err(AuthError::AuthenticationRequired));
}

// =============================================================================
// extractors
// =============================================================================

fn parts(uri: &str, headers: HeaderMap) -> Parts {
    let (mut parts, ()) = axum::http::Request::builder().uri(uri).body(()).unwrap().into_parts();
    parts.headers = headers;
    parts
}

#[tokio::test]
async fn strict_extractor_redirect_keeps_requested_path() {
    let state = test_app_state();
    let mut parts = parts("/dashboard/meals", HeaderMap::new());
    let rejection = AuthenticatedUser::from_request_parts(&mut parts, &state).await.unwrap_err();
    let response = rejection.into_response();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()["location"], "/login?callbackUrl=%2Fdashboard%2Fmeals");
}

#[tokio::test]
async fn strict_extractor_accepts_valid_cookie() {
    let state = test_app_state();
    let mut parts = parts("/dashboard", with_cookie(&valid_token()));
    let user = AuthenticatedUser::from_request_parts(&mut parts, &state).await.unwrap();
    assert_eq!(user.user_id, 7);
}

#[tokio::test]
async fn soft_extractor_never_rejects() {
    let state = test_app_state();
    let mut parts = parts("/", with_cookie("garbage"));
    let auth = ServerAuth::from_request_parts(&mut parts, &state).await.unwrap();
    assert_eq!(auth, ServerAuth::unauthenticated());
}
