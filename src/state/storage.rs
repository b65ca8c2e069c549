//! Durable key/value storage backing the session.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store persists through this trait instead of touching
//! `localStorage` directly, so SSR and native tests can run against
//! [`MemoryStorage`] while the browser build uses [`LocalStorage`].
//!
//! TRADE-OFFS
//! ==========
//! Reads never fail: an unavailable store reads as empty, matching how the
//! browser treats a missing key. Writes report errors so callers can log them.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;

/// Errors raised by durable-storage writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("local storage rejected write to `{key}`: {reason}")]
    Rejected { key: String, reason: String },
}

/// Synchronous string key/value store with `localStorage` semantics.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` verbatim under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store is unavailable or refuses
    /// the write (e.g. quota exceeded).
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store is unavailable.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process store used by tests and server-side rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing entries.
    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: items.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Browser `window.localStorage`.
///
/// Zero-sized: the storage handle is looked up on every call so the type stays
/// `Send + Sync` and can live inside reactive signals. Outside the `hydrate`
/// build it behaves as an always-empty store that rejects writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalStorage;

#[cfg(feature = "hydrate")]
fn browser_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[cfg(feature = "hydrate")]
fn js_reason(err: &wasm_bindgen::JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            browser_storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            None
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            let storage = browser_storage().ok_or(StorageError::Unavailable)?;
            storage.set_item(key, value).map_err(|e| StorageError::Rejected {
                key: key.to_owned(),
                reason: js_reason(&e),
            })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            let storage = browser_storage().ok_or(StorageError::Unavailable)?;
            storage.remove_item(key).map_err(|e| StorageError::Rejected {
                key: key.to_owned(),
                reason: js_reason(&e),
            })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }
}
