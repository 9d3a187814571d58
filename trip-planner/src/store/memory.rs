//! In-memory document store.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::RwLock;

use super::document::{DocumentStore, validate_key};
use super::error::StorageError;

type Collections = BTreeMap<String, BTreeMap<String, Value>>;

/// Document store held in memory.
///
/// Clones share the same documents. Useful for tests and for running
/// without a configured data directory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with a backend error, or
    /// restore normal operation.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of documents in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        let guard = self.collections.read().await;
        guard.get(collection).map_or(0, BTreeMap::len)
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("store unavailable".to_string()));
        }
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    async fn put(&self, collection: &str, id: &str, document: Value) -> Result<(), StorageError> {
        self.check_available()?;
        validate_key(collection)?;
        validate_key(id)?;

        let mut guard = self.collections.write().await;
        guard
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StorageError> {
        self.check_available()?;
        validate_key(collection)?;
        validate_key(id)?;

        let guard = self.collections.read().await;
        Ok(guard.get(collection).and_then(|docs| docs.get(id)).cloned())
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, StorageError> {
        self.check_available()?;
        validate_key(collection)?;

        let guard = self.collections.read().await;
        let Some(docs) = guard.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .values()
            .filter(|doc| doc.get(field) == Some(value))
            .cloned()
            .collect())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StorageError> {
        self.check_available()?;
        validate_key(collection)?;
        validate_key(id)?;

        let mut guard = self.collections.write().await;
        Ok(guard
            .get_mut(collection)
            .is_some_and(|docs| docs.remove(id).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_get_delete() {
        let store = MemoryStore::new();
        store.put("trips", "t1", json!({"userId": "u1"})).await.unwrap();

        assert_eq!(
            store.get("trips", "t1").await.unwrap(),
            Some(json!({"userId": "u1"}))
        );
        assert!(store.get("trips", "missing").await.unwrap().is_none());

        assert!(store.delete("trips", "t1").await.unwrap());
        assert!(!store.delete("trips", "t1").await.unwrap());
        assert_eq!(store.len("trips").await, 0);
    }

    #[tokio::test]
    async fn put_overwrites() {
        let store = MemoryStore::new();
        store.put("trips", "t1", json!({"v": 1})).await.unwrap();
        store.put("trips", "t1", json!({"v": 2})).await.unwrap();

        assert_eq!(store.len("trips").await, 1);
        assert_eq!(store.get("trips", "t1").await.unwrap(), Some(json!({"v": 2})));
    }

    #[tokio::test]
    async fn find_eq_filters_and_orders_by_id() {
        let store = MemoryStore::new();
        store.put("trips", "b", json!({"userId": "u1", "n": 2})).await.unwrap();
        store.put("trips", "a", json!({"userId": "u1", "n": 1})).await.unwrap();
        store.put("trips", "c", json!({"userId": "u2", "n": 3})).await.unwrap();

        let found = store.find_eq("trips", "userId", &json!("u1")).await.unwrap();
        let ns: Vec<_> = found.iter().map(|d| d["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![1, 2]);

        let none = store.find_eq("other", "userId", &json!("u1")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn unavailable_store_fails() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        let err = store.put("trips", "t1", json!({})).await.unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)));

        store.set_unavailable(false);
        assert!(store.put("trips", "t1", json!({})).await.is_ok());
    }

    #[tokio::test]
    async fn invalid_keys_rejected_by_every_operation() {
        let store = MemoryStore::new();

        let err = store.put("trips", "../x", json!({})).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));

        let err = store.get("trips", "../x").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));

        let err = store.get("../trips", "t1").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));

        let err = store
            .find_eq("a/b", "userId", &json!("u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));

        let err = store.delete("trips", "").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
