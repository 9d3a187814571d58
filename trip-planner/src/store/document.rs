//! Document store contract.

use std::future::Future;

use serde_json::Value;

use super::error::StorageError;

/// A document-oriented store addressed by collection name and document id.
///
/// Writes replace the whole document. Queries return documents ordered by
/// id, which keeps ordering stable for a given store snapshot.
pub trait DocumentStore {
    /// Write a document, replacing any existing one with the same id.
    fn put(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Read a document by id.
    fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<Value>, StorageError>> + Send;

    /// All documents whose top-level `field` equals `value`.
    fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> impl Future<Output = Result<Vec<Value>, StorageError>> + Send;

    /// Delete a document. Returns whether it existed.
    fn delete(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<bool, StorageError>> + Send;
}

/// Check that a collection name or document id is safe to use as a key.
///
/// Keys become path components in file-backed stores, so only ASCII
/// letters, digits, `-` and `_` are accepted.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
