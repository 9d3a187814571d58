//! File-backed document store.
//!
//! Each document is a pretty-printed JSON file at
//! `<root>/<collection>/<id>.json`. Writes go to a uniquely named
//! temporary file in the same directory which is then renamed over the
//! target, so readers see either the old document or the new one, never
//! a partial write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use super::document::{DocumentStore, validate_key};
use super::error::StorageError;

const DOCUMENT_EXTENSION: &str = "json";

/// Document store rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created on first
    /// write if it does not exist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf, StorageError> {
        validate_key(collection)?;
        Ok(self.root.join(collection))
    }

    fn document_path(&self, collection: &str, id: &str) -> Result<PathBuf, StorageError> {
        validate_key(id)?;
        Ok(self
            .collection_dir(collection)?
            .join(format!("{id}.{DOCUMENT_EXTENSION}")))
    }

    /// Paths of all documents in a collection, sorted by file name.
    async fn document_paths(&self, collection: &str) -> Result<Vec<PathBuf>, StorageError> {
        let dir = self.collection_dir(collection)?;

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some(DOCUMENT_EXTENSION) {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }
}

impl DocumentStore for FileStore {
    async fn put(&self, collection: &str, id: &str, document: Value) -> Result<(), StorageError> {
        let path = self.document_path(collection, id)?;
        let dir = self.collection_dir(collection)?;

        tokio::fs::create_dir_all(&dir).await?;

        let json = serde_json::to_vec_pretty(&document)?;
        let tmp = dir.join(format!(".{id}.{}.tmp", uuid::Uuid::new_v4()));

        if let Err(e) = tokio::fs::write(&tmp, &json).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(path = %path.display(), bytes = json.len(), "Document written");
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StorageError> {
        let path = self.document_path(collection, id)?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, StorageError> {
        let mut matches = Vec::new();

        for path in self.document_paths(collection).await? {
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                // Deleted between listing and reading
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            let document: Value = serde_json::from_slice(&bytes).map_err(|e| {
                warn!(path = %path.display(), error = %e, "Unreadable document");
                StorageError::from(e)
            })?;

            if document.get(field) == Some(value) {
                matches.push(document);
            }
        }

        Ok(matches)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StorageError> {
        let path = self.document_path(collection, id)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn save_and_load_document() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.put("trips", "t1", json!({"userId": "u1"})).await.unwrap();

        assert!(dir.path().join("trips").join("t1.json").exists());
        assert_eq!(
            store.get("trips", "t1").await.unwrap(),
            Some(json!({"userId": "u1"}))
        );
    }

    #[tokio::test]
    async fn creates_nested_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("store");
        let store = FileStore::new(&root);

        store.put("trips", "t1", json!({})).await.unwrap();
        assert!(root.join("trips").join("t1.json").exists());
    }

    #[tokio::test]
    async fn overwrite_leaves_single_file_and_no_temporaries() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.put("trips", "t1", json!({"v": 1})).await.unwrap();
        store.put("trips", "t1", json!({"v": 2})).await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path().join("trips"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["t1.json".to_string()]);
        assert_eq!(store.get("trips", "t1").await.unwrap(), Some(json!({"v": 2})));
    }

    #[tokio::test]
    async fn missing_collection_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.get("trips", "t1").await.unwrap().is_none());
        assert!(
            store
                .find_eq("trips", "userId", &json!("u1"))
                .await
                .unwrap()
                .is_empty()
        );
        assert!(!store.delete("trips", "t1").await.unwrap());
    }

    #[tokio::test]
    async fn find_eq_skips_non_documents() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.put("trips", "b", json!({"userId": "u1", "n": 2})).await.unwrap();
        store.put("trips", "a", json!({"userId": "u1", "n": 1})).await.unwrap();
        store.put("trips", "c", json!({"userId": "u2", "n": 3})).await.unwrap();
        std::fs::write(dir.path().join("trips").join(".x.tmp"), "garbage").unwrap();

        let found = store.find_eq("trips", "userId", &json!("u1")).await.unwrap();
        let ns: Vec<_> = found.iter().map(|d| d["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![1, 2]);
    }

    #[tokio::test]
    async fn corrupt_document_is_serialization_error() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        std::fs::create_dir_all(dir.path().join("trips")).unwrap();
        std::fs::write(dir.path().join("trips").join("bad.json"), "{not json").unwrap();

        let err = store.get("trips", "bad").await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[tokio::test]
    async fn delete_removes_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.put("trips", "t1", json!({})).await.unwrap();
        assert!(store.delete("trips", "t1").await.unwrap());
        assert!(!dir.path().join("trips").join("t1.json").exists());
    }

    #[tokio::test]
    async fn path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let err = store.put("trips", "../escape", json!({})).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));

        let err = store.get("../trips", "t1").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
