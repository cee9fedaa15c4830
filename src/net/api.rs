//! Typed HTTP client for `/auth/register`, `/auth/login`, and `/get-calories`.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{ApiErrorBody, AuthResponse, CalorieRequest, CalorieResponse, LoginData, RegisterData};
use super::validate::{self, ValidationError};
use crate::store::AuthStore;

pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Invalid(#[from] ValidationError),

    /// The session was rejected; the auth store has already been signed out.
    #[error("session expired, sign in again")]
    Unauthorized,

    #[error("too many requests, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("server error: status {status}")]
    Server { status: u16 },

    /// Any other non-success status, with the API's error body when it sent one.
    #[error("request rejected: status {status}")]
    Rejected { status: u16, body: Option<ApiErrorBody> },

    #[error("network error: {0}")]
    Network(String),

    #[error("response parse failed: {0}")]
    Decode(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// Map a non-success status and its raw body to an error variant.
#[must_use]
pub fn classify_failure(status: u16, body: &str) -> ApiError {
    match status {
        401 => ApiError::Unauthorized,
        429 => {
            let retry_after_secs = serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v.get("retryAfter").and_then(serde_json::Value::as_u64))
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            ApiError::RateLimited { retry_after_secs }
        }
        500..=599 => ApiError::Server { status },
        _ => ApiError::Rejected { status, body: serde_json::from_str(body).ok() },
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: AuthStore,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, store: AuthStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned(), store })
    }

    /// Register, then sign the store in with the returned session.
    ///
    /// # Errors
    ///
    /// Returns a validation error before sending, or the API failure.
    pub async fn register(&self, data: &RegisterData) -> Result<AuthResponse, ApiError> {
        validate::register(data)?;
        let resp: AuthResponse = self.post("/auth/register", data).await?;
        self.store.set_auth(resp.user.clone(), resp.token.clone());
        Ok(resp)
    }

    /// Sign in, then sign the store in with the returned session.
    ///
    /// # Errors
    ///
    /// Returns a validation error before sending, or the API failure.
    pub async fn login(&self, data: &LoginData) -> Result<AuthResponse, ApiError> {
        validate::login(data)?;
        let resp: AuthResponse = self.post("/auth/login", data).await?;
        self.store.set_auth(resp.user.clone(), resp.token.clone());
        Ok(resp)
    }

    /// Look up the calorie breakdown for a dish.
    ///
    /// # Errors
    ///
    /// Returns a validation error before sending, or the API failure.
    pub async fn get_calories(&self, req: &CalorieRequest) -> Result<CalorieResponse, ApiError> {
        validate::calorie(req)?;
        self.post("/get-calories", req).await
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.post(&url).json(body);
        if let Some(token) = self.store.persisted_token() {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, %path, "api request failed");
            ApiError::Network(e.to_string())
        })?;

        let status = resp.status();
        if status.is_success() {
            return resp.json::<R>().await.map_err(|e| ApiError::Decode(e.to_string()));
        }

        let body = resp.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            tracing::info!(%path, "api rejected session; signing out");
            self.store.logout();
            self.store.clear_persisted();
        } else {
            tracing::warn!(status = status.as_u16(), %path, "api request rejected");
        }
        Err(classify_failure(status.as_u16(), &body))
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
