//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers and the route guard via the
//! `State` extractor. It only carries read-only data: the token codec built
//! from the configured secret and the public API base URL. Nothing in it is
//! mutated per request, so concurrent requests never share mutable state.

use std::sync::Arc;

use crate::auth::token::TokenCodec;
use crate::config::Config;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone, Debug)]
pub struct AppState {
    pub codec: Arc<TokenCodec>,
    /// Base URL of the external auth/nutrition API, handed to browser clients.
    pub api_base_url: Arc<str>,
}

impl AppState {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            codec: Arc::new(TokenCodec::new(config.jwt_secret.expose())),
            api_base_url: Arc::from(config.api_base_url.as_str()),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
