//! Hydration gate for the interactive app.
//!
//! Renders nothing, not even a placeholder, until the auth store has finished
//! loading from durable storage. That hides the flash of a signed-out UI
//! before an existing session is restored. Once open the gate renders
//! unconditionally; auth branching belongs to individual pages.

use tokio::sync::watch;

use super::AuthStore;

#[derive(Debug, Clone)]
pub struct HydrationGate {
    hydrated: watch::Receiver<bool>,
}

impl HydrationGate {
    #[must_use]
    pub fn new(store: &AuthStore) -> Self {
        Self { hydrated: store.subscribe_hydrated() }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        *self.hydrated.borrow()
    }

    /// Run `children` only once the store is hydrated.
    pub fn render<T>(&self, children: impl FnOnce() -> T) -> Option<T> {
        self.is_open().then(children)
    }

    /// Suspend until hydration completes. There is no timeout: a storage load
    /// that never finishes keeps the app unrendered.
    pub async fn wait_hydrated(&mut self) {
        // The store owns the sender, so a closed channel only happens once
        // every store handle is gone; nothing will render then anyway.
        let _ = self.hydrated.wait_for(|hydrated| *hydrated).await;
    }
}
