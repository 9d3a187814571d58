//! Trip persistence.
//!
//! `TripRepository` maps planned trips onto a `DocumentStore`, which is
//! either held in memory or backed by JSON files on disk.

mod document;
mod error;
mod file;
mod memory;
mod repository;

pub use document::{DocumentStore, validate_key};
pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use repository::{TRIPS_COLLECTION, TripRepository};
