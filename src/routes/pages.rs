//! Server-rendered pages.
//!
//! Placeholder markup only. Each handler makes its own auth decision and
//! re-verifies the session instead of trusting the guard's headers.

use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::auth::{AuthenticatedUser, DASHBOARD_PATH, ServerAuth};
use crate::net::types::User;

/// `GET /`: landing page; shows who is signed in, if anyone.
pub async fn home(auth: ServerAuth) -> Html<String> {
    let header = match &auth.user {
        Some(user) if auth.is_authenticated => format!("Signed in as {}", display_name(user)),
        _ => r#"<a href="/login">Sign in</a> · <a href="/register">Register</a>"#.to_owned(),
    };
    page("CalorieTracker", &header)
}

/// `GET /login`: bounce signed-in users to the dashboard.
pub async fn login(auth: ServerAuth) -> Response {
    if auth.is_authenticated {
        return Redirect::temporary(DASHBOARD_PATH).into_response();
    }
    page("Sign in", r#"<div id="login-form"></div>"#).into_response()
}

/// `GET /register`: bounce signed-in users to the dashboard.
pub async fn register(auth: ServerAuth) -> Response {
    if auth.is_authenticated {
        return Redirect::temporary(DASHBOARD_PATH).into_response();
    }
    page("Create account", r#"<div id="register-form"></div>"#).into_response()
}

/// `GET /dashboard`: needs a verified user; the extractor redirects otherwise.
pub async fn dashboard(auth: AuthenticatedUser) -> Html<String> {
    let body = format!(
        r#"<p>Welcome back, {}</p><div id="meal-form" data-user-id="{}"></div>"#,
        display_name(&auth.user),
        auth.user_id
    );
    page("Dashboard", &body)
}

fn display_name(user: &User) -> String {
    let name = format!("{} {}", user.first_name, user.last_name);
    let name = name.trim();
    if name.is_empty() { escape(&user.email) } else { escape(name) }
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{title}</title></head><body>{body}</body></html>"
    ))
}

/// Minimal HTML escaping for claim-derived text.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
