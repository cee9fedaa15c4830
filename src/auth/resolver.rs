//! Server-side auth resolution for rendered pages.
//!
//! DESIGN
//! ======
//! Pages never trust the route guard's `x-authenticated` stamp. They pick a
//! token (cookie, bearer header, then the guard-forwarded `x-auth-token`) and
//! verify it again with the shared codec. The user is rebuilt purely from the
//! verified claims; there is no user store behind this.
//!
//! Two flavours:
//! - [`resolve`] / [`ServerAuth`] is soft: failure is an unauthenticated value.
//! - [`require_auth`] / [`AuthenticatedUser`] is strict: failure is
//!   [`AuthError::AuthenticationRequired`].

use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum::response::Redirect;
use serde::Serialize;

use super::headers::page_token;
use super::login_redirect;
use super::token::{SessionClaims, TokenCodec};
use crate::net::types::User;
use crate::state::AppState;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("authentication required")]
    AuthenticationRequired,
}

/// Outcome of soft resolution. `is_authenticated` implies every other field is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerAuth {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl ServerAuth {
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self { is_authenticated: false, user: None, token: None, user_id: None }
    }
}

/// Outcome of strict resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
    pub user_id: i64,
}

impl From<&SessionClaims> for User {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            first_name: claims.first_name.clone().unwrap_or_default(),
            last_name: claims.last_name.clone().unwrap_or_default(),
            email: claims.email.clone().unwrap_or_default(),
        }
    }
}

/// Resolve the request's session, verifying the token independently.
#[must_use]
pub fn resolve(codec: &TokenCodec, headers: &HeaderMap) -> ServerAuth {
    let Some(token) = page_token(headers) else {
        return ServerAuth::unauthenticated();
    };

    match codec.verify(&token) {
        Ok(claims) => ServerAuth {
            is_authenticated: true,
            user: Some(User::from(&claims)),
            token: Some(token),
            user_id: Some(claims.user_id),
        },
        Err(reason) => {
            tracing::debug!(%reason, "page token rejected");
            ServerAuth::unauthenticated()
        }
    }
}

/// Strict variant of [`resolve`] for code that cannot proceed without a user.
///
/// # Errors
///
/// Returns [`AuthError::AuthenticationRequired`] when no valid token is present.
pub fn require_auth(codec: &TokenCodec, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
    match resolve(codec, headers) {
        ServerAuth { is_authenticated: true, user: Some(user), token: Some(token), user_id: Some(user_id) } => {
            Ok(AuthenticatedUser { user, token, user_id })
        }
        _ => Err(AuthError::AuthenticationRequired),
    }
}

// =============================================================================
// EXTRACTORS
// =============================================================================

impl<S> FromRequestParts<S> for ServerAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        Ok(resolve(&app_state.codec, &parts.headers))
    }
}

/// Use as a handler parameter to require authentication. Rejects with a
/// redirect to the login page that preserves the requested path.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        require_auth(&app_state.codec, &parts.headers).map_err(|e| {
            let path = parts.uri.path();
            tracing::warn!(error = %e, %path, "rendering requires an authenticated user");
            Redirect::temporary(&login_redirect(path))
        })
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
