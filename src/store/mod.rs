//! Client-side persisted auth store.
//!
//! DESIGN
//! ======
//! `AuthStore` is an explicitly constructed handle (clone it to share) over
//! `{user, token, is_authenticated, hydrated}`. Only [`AuthStore::set_auth`]
//! and [`AuthStore::logout`] mutate the session fields, each under a single
//! write lock, so no reader sees a token without `is_authenticated`.
//!
//! Every mutation persists the whole state as a JSON envelope under
//! `auth-storage`, and that same write re-derives the `auth-token` cookie from
//! the persisted token. As long as writes go through the store, durable
//! storage and cookie cannot disagree.
//!
//! HYDRATION
//! =========
//! [`AuthStore::rehydrate`] loads the previous envelope and then flips
//! `hydrated` exactly once. The restored state is written back, so the cookie
//! is re-derived even if the browser dropped it. A corrupt envelope is dropped
//! and the store starts unauthenticated. The flag is broadcast over a `watch`
//! channel so the [`gate::HydrationGate`] can wait for it.

pub mod gate;
pub mod storage;

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::auth::cookie::{expired_session_cookie, session_cookie};
use crate::auth::LOGIN_PATH;
use crate::net::types::User;
use storage::{CookieWriter, DurableStorage};

/// Durable storage key holding the persisted envelope.
pub const STORAGE_KEY: &str = "auth-storage";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    #[serde(default)]
    pub hydrated: bool,
}

impl AuthState {
    /// Enforce `is_authenticated == (user && token)`. A half-populated record
    /// is treated as signed out.
    fn normalized(self) -> Self {
        match (self.user, self.token) {
            (Some(user), Some(token)) => {
                Self { user: Some(user), token: Some(token), is_authenticated: true, hydrated: self.hydrated }
            }
            _ => Self { hydrated: self.hydrated, ..Self::default() },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedEnvelope {
    state: AuthState,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("persisted auth state is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Outcome of a client-side route check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientGuard {
    Allowed,
    Redirect(String),
}

#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("is_authenticated", &self.is_authenticated())
            .field("hydrated", &self.is_hydrated())
            .finish_non_exhaustive()
    }
}

struct Inner {
    state: RwLock<AuthState>,
    storage: Arc<dyn DurableStorage>,
    cookies: Arc<dyn CookieWriter>,
    hydrated: watch::Sender<bool>,
}

impl AuthStore {
    /// Create an empty, not-yet-hydrated store.
    #[must_use]
    pub fn new(storage: Arc<dyn DurableStorage>, cookies: Arc<dyn CookieWriter>) -> Self {
        let (hydrated, _) = watch::channel(false);
        Self { inner: Arc::new(Inner { state: RwLock::new(AuthState::default()), storage, cookies, hydrated }) }
    }

    /// Browser store over `localStorage` and `document.cookie`.
    #[cfg(feature = "hydrate")]
    #[must_use]
    pub fn browser() -> Self {
        Self::new(Arc::new(storage::LocalStorage), Arc::new(storage::DocumentCookies))
    }

    /// Consistent copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        *self.inner.hydrated.borrow()
    }

    /// Receiver that observes the one-shot hydration flag.
    #[must_use]
    pub fn subscribe_hydrated(&self) -> watch::Receiver<bool> {
        self.inner.hydrated.subscribe()
    }

    /// Record a fresh session and mirror its token into the cookie.
    pub fn set_auth(&self, user: User, token: String) {
        let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
        state.user = Some(user);
        state.token = Some(token);
        state.is_authenticated = true;
        self.persist(&state);
        tracing::debug!("auth store signed in");
    }

    /// Clear the session and expire the mirrored cookie immediately.
    pub fn logout(&self) {
        let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
        state.user = None;
        state.token = None;
        state.is_authenticated = false;
        self.persist(&state);
        tracing::debug!("auth store signed out");
    }

    /// Drop the persisted envelope and the cookie without touching in-memory state.
    pub fn clear_persisted(&self) {
        self.inner.cookies.write(expired_session_cookie());
        self.inner.storage.remove_item(STORAGE_KEY);
    }

    /// Load the persisted envelope, then mark the store hydrated.
    ///
    /// A restored envelope is written back in normalized form, which also
    /// re-derives the cookie. A corrupt envelope is removed (cookie included)
    /// and the store proceeds signed out.
    pub fn rehydrate(&self) {
        match self.load() {
            Ok(Some(restored)) => {
                let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
                let hydrated = state.hydrated;
                *state = AuthState { hydrated, ..restored.normalized() };
                // Write back so storage and cookie match what was restored.
                self.persist(&state);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "discarding persisted auth state");
                self.clear_persisted();
            }
        }
        self.set_hydrated();
    }

    /// Flip `hydrated` to true. Returns `false` if it was already set.
    pub fn set_hydrated(&self) -> bool {
        let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
        let flipped = self.inner.hydrated.send_if_modified(|hydrated| {
            if *hydrated {
                false
            } else {
                *hydrated = true;
                true
            }
        });
        state.hydrated = true;
        flipped
    }

    /// Token as currently persisted, read straight from durable storage.
    /// A corrupt envelope is removed and treated as no token.
    #[must_use]
    pub fn persisted_token(&self) -> Option<String> {
        match self.load() {
            Ok(state) => state.and_then(|s| s.token),
            Err(e) => {
                tracing::warn!(error = %e, "discarding persisted auth state");
                self.clear_persisted();
                None
            }
        }
    }

    /// Client-side route check: allowed when signed in, otherwise redirect.
    #[must_use]
    pub fn guard(&self, redirect_to: Option<&str>) -> ClientGuard {
        if self.is_authenticated() {
            ClientGuard::Allowed
        } else {
            ClientGuard::Redirect(redirect_to.unwrap_or(LOGIN_PATH).to_owned())
        }
    }

    fn load(&self) -> Result<Option<AuthState>, StoreError> {
        let Some(raw) = self.inner.storage.get_item(STORAGE_KEY) else {
            return Ok(None);
        };
        let envelope: PersistedEnvelope = serde_json::from_str(&raw)?;
        Ok(Some(envelope.state))
    }

    /// The single write path: durable storage plus the derived cookie.
    fn persist(&self, state: &AuthState) {
        let envelope = PersistedEnvelope { state: state.clone(), version: 0 };
        let raw = match serde_json::to_string(&envelope) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "auth state serialization failed");
                return;
            }
        };

        let cookie = match &envelope.state.token {
            Some(token) => session_cookie(token, self.inner.cookies.secure_origin()),
            None => expired_session_cookie(),
        };
        self.inner.cookies.write(cookie);
        self.inner.storage.set_item(STORAGE_KEY, &raw);
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
