//! Saved places error types.

use std::path::PathBuf;

/// Errors that can occur when loading saved places.
#[derive(Debug, thiserror::Error)]
pub enum PlacesError {
    /// The places file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The places file is not a JSON list of places
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reload requested on places that were not loaded from a file
    #[error("saved places have no backing file")]
    NoSource,
}
