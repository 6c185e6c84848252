//! In-memory store, the test double

use std::collections::HashMap;
use std::sync::Mutex;

use super::KeyValueStore;

/// Volatile [`KeyValueStore`] backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.values.lock().map(|values| values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: serde_json::Value) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let store = MemoryStore::new();
        store.set("a", serde_json::json!({"x": 1}));

        assert_eq!(store.get("a"), Some(serde_json::json!({"x": 1})));
        assert_eq!(store.get("b"), None);
    }

    #[test]
    fn last_write_wins() {
        let store = MemoryStore::new();
        store.set("a", serde_json::json!(1));
        store.set("a", serde_json::json!(2));

        assert_eq!(store.get("a"), Some(serde_json::json!(2)));
        assert_eq!(store.len(), 1);
    }
}
