//! Key-value cache capability.
//!
//! Stores are passed explicitly to whatever needs caching; nothing in the
//! crate holds a global store.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

pub const DEFAULT_PREFIX: &str = "app.";

/// A string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn unset(&self, key: &str);
    fn clear(&self);
    fn keys(&self) -> Vec<String>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries().insert(key.to_string(), value);
    }

    fn unset(&self, key: &str) {
        self.entries().remove(key);
    }

    fn clear(&self) {
        self.entries().clear();
    }

    fn keys(&self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }
}

impl KeyValueStore for Box<dyn KeyValueStore> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) {
        (**self).set(key, value)
    }

    fn unset(&self, key: &str) {
        (**self).unset(key)
    }

    fn clear(&self) {
        (**self).clear()
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// Scopes an underlying store to keys starting with a prefix and stores
/// values as JSON.
pub struct PrefixedStore<S> {
    inner: S,
    prefix: String,
}

impl<S: KeyValueStore> PrefixedStore<S> {
    pub fn new(inner: S) -> Self {
        Self::with_prefix(inner, DEFAULT_PREFIX)
    }

    pub fn with_prefix(inner: S, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Decode a stored value. Entries that no longer decode as `T` read as absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.inner.get(&self.full_key(key))?;
        serde_json::from_str(&raw).ok()
    }

    /// Store `value` as JSON. A value that serializes to `null` unsets the key.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), serde_json::Error> {
        let encoded = serde_json::to_value(value)?;
        if encoded.is_null() {
            self.unset(key);
        } else {
            self.inner.set(&self.full_key(key), encoded.to_string());
        }
        Ok(())
    }

    /// Every entry under the prefix, keyed without it.
    pub fn all(&self) -> BTreeMap<String, String> {
        self.keys()
            .into_iter()
            .filter_map(|key| {
                let value = self.inner.get(&self.full_key(&key))?;
                Some((key, value))
            })
            .collect()
    }
}

impl<S: KeyValueStore> KeyValueStore for PrefixedStore<S> {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(&self.full_key(key))
    }

    fn set(&self, key: &str, value: String) {
        self.inner.set(&self.full_key(key), value);
    }

    fn unset(&self, key: &str) {
        self.inner.unset(&self.full_key(key));
    }

    /// Only removes entries under this store's prefix.
    fn clear(&self) {
        for key in self.inner.keys() {
            if key.starts_with(&self.prefix) {
                self.inner.unset(&key);
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        self.inner
            .keys()
            .into_iter()
            .filter_map(|key| key.strip_prefix(&self.prefix).map(str::to_string))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.set("a", "1".into());
        assert_eq!(store.get("a").as_deref(), Some("1"));
        store.unset("a");
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_prefixed_keys_are_scoped() {
        let shared = MemoryStore::new();
        shared.set("other", "x".into());
        let store = PrefixedStore::new(shared);
        store.set("station.3400TH", "{}".into());

        assert_eq!(store.keys(), vec!["station.3400TH"]);
        assert_eq!(store.inner.get("app.station.3400TH").as_deref(), Some("{}"));
    }

    #[test]
    fn test_prefixed_clear_leaves_foreign_keys() {
        let shared = MemoryStore::new();
        shared.set("other", "x".into());
        let store = PrefixedStore::new(shared);
        store.set("mine", "y".into());
        store.clear();

        assert!(store.keys().is_empty());
        assert_eq!(store.inner.get("other").as_deref(), Some("x"));
    }

    #[test]
    fn test_json_values_and_null_unsets() {
        let store = PrefixedStore::new(MemoryStore::new());
        store.set_json("k", &json!({ "n": 1 })).unwrap();
        assert_eq!(store.get_json::<serde_json::Value>("k"), Some(json!({ "n": 1 })));

        store.set_json("k", &Option::<u32>::None).unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_all_strips_prefix() {
        let store = PrefixedStore::with_prefix(MemoryStore::new(), "rd:");
        store.set_json("x", &1).unwrap();
        store.set_json("y", &"two").unwrap();
        let all = store.all();
        assert_eq!(all.get("x").map(String::as_str), Some("1"));
        assert_eq!(all.get("y").map(String::as_str), Some("\"two\""));
    }
}
