//! User's saved places.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::{PlaceId, PlaceRef};

use super::error::PlacesError;

/// Source of place details by id.
pub trait PlaceLookup {
    /// Look up a place by id.
    fn lookup(&self, id: &PlaceId) -> impl Future<Output = Option<PlaceRef>> + Send;

    /// All known places, ordered by id.
    fn list(&self) -> impl Future<Output = Vec<PlaceRef>> + Send;
}

/// Thread-safe set of saved places.
///
/// Optionally backed by a JSON file containing a list of places, which can
/// be reloaded while the lookup is shared.
#[derive(Clone, Default)]
pub struct SavedPlaces {
    inner: Arc<RwLock<HashMap<PlaceId, PlaceRef>>>,
    source: Option<PathBuf>,
}

impl SavedPlaces {
    /// Create an empty lookup with no backing file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a lookup from an in-memory list of places.
    pub fn from_places(places: impl IntoIterator<Item = PlaceRef>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(build_map(places))),
            source: None,
        }
    }

    /// Load places from a JSON file.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, PlacesError> {
        let path = path.into();
        let map = build_map(read_places(&path).await?);
        info!(path = %path.display(), count = map.len(), "Loaded saved places");

        Ok(Self {
            inner: Arc::new(RwLock::new(map)),
            source: Some(path),
        })
    }

    /// Re-read the backing file.
    ///
    /// On success, replaces the current set. On failure, the existing set
    /// is preserved and the error is returned.
    pub async fn reload(&self) -> Result<usize, PlacesError> {
        let path = self.source.as_ref().ok_or(PlacesError::NoSource)?;
        let map = build_map(read_places(path).await?);
        let count = map.len();

        let mut guard = self.inner.write().await;
        *guard = map;

        Ok(count)
    }

    /// Add or replace a place.
    pub async fn insert(&self, place: PlaceRef) {
        let mut guard = self.inner.write().await;
        guard.insert(place.id.clone(), place);
    }

    /// Remove a place, returning it if it was present.
    pub async fn remove(&self, id: &PlaceId) -> Option<PlaceRef> {
        let mut guard = self.inner.write().await;
        guard.remove(id)
    }

    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.is_empty()
    }
}

impl PlaceLookup for SavedPlaces {
    async fn lookup(&self, id: &PlaceId) -> Option<PlaceRef> {
        let guard = self.inner.read().await;
        guard.get(id).cloned()
    }

    async fn list(&self) -> Vec<PlaceRef> {
        let guard = self.inner.read().await;
        let mut places: Vec<_> = guard.values().cloned().collect();
        places.sort_by(|a, b| a.id.cmp(&b.id));
        places
    }
}

async fn read_places(path: &Path) -> Result<Vec<PlaceRef>, PlacesError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PlacesError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&json).map_err(|source| PlacesError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the id → place map. Later entries win over earlier duplicates.
fn build_map(places: impl IntoIterator<Item = PlaceRef>) -> HashMap<PlaceId, PlaceRef> {
    let mut map = HashMap::new();
    for place in places {
        if let Some(previous) = map.insert(place.id.clone(), place) {
            warn!(place_id = %previous.id, "Duplicate saved place, keeping the later entry");
        }
    }
    map
}
