use axum::body::{Body, to_bytes};
use axum::http::{StatusCode, header};
use tower::ServiceExt;

use super::*;
use crate::routes::app;
use crate::state::test_helpers::{OTHER_SECRET, claims, mint, mint_with_secret, now_secs, test_app_state, valid_token};

async fn get(uri: &str, headers: &[(&str, String)]) -> Response {
    let mut builder = axum::http::Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, value);
    }
    app(test_app_state())
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn cookie(token: &str) -> (&'static str, String) {
    ("cookie", format!("auth-token={token}"))
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// =============================================================================
// classify / decide
// =============================================================================

#[test]
fn classify_path_classes() {
    assert_eq!(classify("/dashboard"), PathClass::Protected);
    assert_eq!(classify("/dashboard/history"), PathClass::Protected);
    assert_eq!(classify("/login"), PathClass::AuthOnly);
    assert_eq!(classify("/register"), PathClass::AuthOnly);
    assert_eq!(classify("/"), PathClass::Root);
    assert_eq!(classify("/about"), PathClass::Neutral);
    assert_eq!(classify("/dashboards"), PathClass::Neutral);
}

#[test]
fn classify_excludes_api_and_assets() {
    for path in ["/api", "/api/healthz", "/pkg/app.wasm", "/static/logo.svg", "/favicon.ico"] {
        assert_eq!(classify(path), PathClass::Excluded, "{path}");
    }
}

#[test]
fn decision_table() {
    let login = GuardDecision::Redirect("/login?callbackUrl=%2Fdashboard".into());
    let dashboard = GuardDecision::Redirect("/dashboard".into());

    assert_eq!(decide(PathClass::Protected, "/dashboard", false), login);
    assert_eq!(decide(PathClass::Protected, "/dashboard", true), GuardDecision::PassThrough);
    assert_eq!(decide(PathClass::AuthOnly, "/login", true), dashboard);
    assert_eq!(decide(PathClass::AuthOnly, "/login", false), GuardDecision::PassThrough);
    assert_eq!(decide(PathClass::Root, "/", true), dashboard);
    assert_eq!(decide(PathClass::Root, "/", false), GuardDecision::PassThrough);
    assert_eq!(decide(PathClass::Neutral, "/about", true), GuardDecision::PassThrough);
    assert_eq!(decide(PathClass::Neutral, "/about", false), GuardDecision::PassThrough);
}

#[test]
fn callback_url_keeps_nested_path() {
    assert_eq!(
        decide(PathClass::Protected, "/dashboard/meals", false),
        GuardDecision::Redirect("/login?callbackUrl=%2Fdashboard%2Fmeals".into())
    );
}

// =============================================================================
// middleware through the router
// =============================================================================

#[tokio::test]
async fn dashboard_without_token_redirects_to_login() {
    let response = get("/dashboard", &[]).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login?callbackUrl=%2Fdashboard");
}

#[tokio::test]
async fn dashboard_with_expired_token_redirects_to_login() {
    let mut expired = claims(7);
    expired.exp = now_secs() - 10;
    let response = get("/dashboard", &[cookie(&mint(&expired))]).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login?callbackUrl=%2Fdashboard");
}

#[tokio::test]
async fn dashboard_with_foreign_token_redirects_to_login() {
    let response = get("/dashboard", &[cookie(&mint_with_secret(&claims(7), OTHER_SECRET))]).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn dashboard_with_valid_cookie_renders_and_stamps_headers() {
    let token = valid_token();
    let response = get("/dashboard", &[cookie(&token)]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[AUTHENTICATED_HEADER], "true");
    assert_eq!(response.headers()[FORWARDED_TOKEN_HEADER], token.as_str());
    let body = body_text(response).await;
    assert!(body.contains("Welcome back, A B"), "{body}");
}

#[tokio::test]
async fn dashboard_with_bearer_header_passes() {
    let response = get("/dashboard", &[("authorization", format!("Bearer {}", valid_token()))]).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn trust_header_alone_does_not_authenticate() {
    let response = get("/dashboard", &[("x-authenticated", "true".into())]).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn login_with_valid_cookie_redirects_to_dashboard() {
    let response = get("/login", &[cookie(&valid_token())]).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn register_with_valid_cookie_redirects_to_dashboard() {
    let response = get("/register", &[cookie(&valid_token())]).await;
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn login_without_token_renders() {
    let response = get("/login", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[AUTHENTICATED_HEADER], "false");
    assert!(response.headers().get(FORWARDED_TOKEN_HEADER).is_none());
}

#[tokio::test]
async fn login_with_invalid_token_renders_and_echoes_token() {
    let response = get("/login", &[cookie("stale-token")]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[AUTHENTICATED_HEADER], "false");
    assert_eq!(response.headers()[FORWARDED_TOKEN_HEADER], "stale-token");
}

#[tokio::test]
async fn root_with_valid_cookie_redirects_to_dashboard() {
    let response = get("/", &[cookie(&valid_token())]).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn root_without_token_passes_through() {
    let response = get("/", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[AUTHENTICATED_HEADER], "false");
    let body = body_text(response).await;
    assert!(body.contains("Sign in"), "{body}");
}

#[tokio::test]
async fn api_namespace_bypasses_guard() {
    let response = get("/api/healthz", &[cookie(&valid_token())]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(AUTHENTICATED_HEADER).is_none());
}

#[tokio::test]
async fn public_config_exposes_api_base_url() {
    let response = get("/api/config", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["apiBaseUrl"], "http://localhost:8000");
}

#[tokio::test]
async fn unknown_protected_descendant_redirects_without_token() {
    let response = get("/dashboard/settings", &[]).await;
    assert_eq!(location(&response), "/login?callbackUrl=%2Fdashboard%2Fsettings");
}
