//! Seams the auth store persists through: a durable key-value store and a
//! cookie writer.
//!
//! In the browser (`hydrate` feature) these are `localStorage` and
//! `document.cookie`. Everywhere else, including tests, the in-memory
//! implementations stand in.

use std::collections::HashMap;
use std::sync::Mutex;

use axum_extra::extract::cookie::Cookie;

use crate::auth::cookie::is_removal;

/// Durable string key-value storage that survives page reloads.
pub trait DurableStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// Writes cookies the server can read on the next navigation.
pub trait CookieWriter: Send + Sync {
    fn write(&self, cookie: Cookie<'static>);
    /// Whether the current page was loaded over HTTPS.
    fn secure_origin(&self) -> bool;
}

// =============================================================================
// IN-MEMORY
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove_item(&self, key: &str) {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
    }
}

/// Cookie jar that behaves like a browser's: removal cookies drop the entry.
#[derive(Debug, Default)]
pub struct MemoryCookies {
    secure_origin: bool,
    jar: Mutex<HashMap<String, Cookie<'static>>>,
}

impl MemoryCookies {
    #[must_use]
    pub fn new(secure_origin: bool) -> Self {
        Self { secure_origin, jar: Mutex::new(HashMap::new()) }
    }

    /// Current cookie stored under `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Cookie<'static>> {
        self.jar
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

impl CookieWriter for MemoryCookies {
    fn write(&self, cookie: Cookie<'static>) {
        let mut jar = self.jar.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if is_removal(&cookie) {
            jar.remove(cookie.name());
        } else {
            jar.insert(cookie.name().to_owned(), cookie);
        }
    }

    fn secure_origin(&self) -> bool {
        self.secure_origin
    }
}

// =============================================================================
// BROWSER
// =============================================================================

/// `window.localStorage`. Calls are no-ops when no window is available.
#[cfg(feature = "hydrate")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

#[cfg(feature = "hydrate")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

#[cfg(feature = "hydrate")]
impl DurableStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove_item(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// `document.cookie`.
#[cfg(feature = "hydrate")]
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentCookies;

#[cfg(feature = "hydrate")]
impl CookieWriter for DocumentCookies {
    fn write(&self, cookie: Cookie<'static>) {
        use wasm_bindgen::JsCast;

        let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Ok(html) = doc.dyn_into::<web_sys::HtmlDocument>() {
            let _ = html.set_cookie(&cookie.to_string());
        }
    }

    fn secure_origin(&self) -> bool {
        web_sys::window()
            .and_then(|w| w.location().protocol().ok())
            .is_some_and(|p| p == "https:")
    }
}
