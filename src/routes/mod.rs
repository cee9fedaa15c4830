//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route sits behind the route guard. The guard itself skips the `/api`
//! namespace and static assets, so the health and config endpoints stay
//! reachable without a session.

pub mod guard;
pub mod pages;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/login", get(pages::login))
        .route("/register", get(pages::register))
        .route("/dashboard", get(pages::dashboard))
        .route("/api/config", get(public_config))
        .route("/api/healthz", get(healthz))
        .layer(middleware::from_fn_with_state(state.clone(), guard::route_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /api/config`: public settings the browser client needs.
async fn public_config(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "apiBaseUrl": &*state.api_base_url }))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
