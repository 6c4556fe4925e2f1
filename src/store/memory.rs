// src/store/memory.rs
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::traits::ConditionStore;

/// In-memory condition store for tests and standalone runs.
#[derive(Debug, Default)]
pub struct MemoryConditionStore {
    records: Mutex<HashMap<String, Vec<u8>>>,
    failing_keys: Mutex<Vec<String>>,
    requested_keys: Mutex<Vec<String>>,
}

impl MemoryConditionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw record under `key`.
    pub fn insert(&self, key: impl Into<String>, bytes: Vec<u8>) {
        self.records.lock().insert(key.into(), bytes);
    }

    /// Make lookups of `key` fail (for testing).
    pub fn fail_key(&self, key: impl Into<String>) {
        self.failing_keys.lock().push(key.into());
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Keys requested so far, in request order (for assertions).
    pub fn requested_keys(&self) -> Vec<String> {
        self.requested_keys.lock().clone()
    }
}

#[async_trait]
impl ConditionStore for MemoryConditionStore {
    async fn get_buffer(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        self.requested_keys.lock().push(key.to_string());

        if self.failing_keys.lock().iter().any(|k| k == key) {
            anyhow::bail!("store unavailable for key {key}");
        }

        Ok(self.records.lock().get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryConditionStore::new();

        assert!(store.get_buffer("entities/t1/e1").await.unwrap().is_none());
        assert_eq!(store.requested_keys(), vec!["entities/t1/e1".to_string()]);
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryConditionStore::new();
        store.insert("accounts/t1/a1", vec![1, 2, 3]);

        let bytes = store.get_buffer("accounts/t1/a1").await.unwrap();
        assert_eq!(bytes, Some(vec![1, 2, 3]));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_failing_key() {
        let store = MemoryConditionStore::new();
        store.insert("entities/t1/e1", vec![1]);
        store.fail_key("entities/t1/e1");

        assert!(store.get_buffer("entities/t1/e1").await.is_err());
    }
}
