//! Raw key-value backends
//!
//! Browser builds use LocalStorage; everything else (native demo, tests)
//! uses an in-memory map.

use std::collections::HashMap;

/// Minimal string key-value store
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;

    /// Overwrite `key`; returns false if the backend rejected the write
    fn set_item(&mut self, key: &str, value: &str) -> bool;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> bool {
        self.items.insert(key.to_string(), value.to_string());
        true
    }
}

/// Browser LocalStorage; a missing or blocked storage reads as empty and drops writes
#[cfg(target_arch = "wasm32")]
#[derive(Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn new() -> Self {
        if Self::storage().is_none() {
            log::warn!("LocalStorage unavailable - progress will not be saved");
        }
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) -> bool {
        Self::storage()
            .map(|s| s.set_item(key, value).is_ok())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_overwrites() {
        let mut store = MemoryStore::new();
        assert!(store.get_item("k").is_none());
        assert!(store.set_item("k", "1"));
        assert!(store.set_item("k", "2"));
        assert_eq!(store.get_item("k").as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }
}
