//! Persistence of planned trips.

use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{PlannedTrip, TripId, UserId};

use super::document::DocumentStore;
use super::error::StorageError;

/// Collection holding one document per planned trip, keyed by trip id.
pub const TRIPS_COLLECTION: &str = "planned_trips";

/// Saves and queries planned trips in a document store.
#[derive(Debug, Clone)]
pub struct TripRepository<S> {
    store: S,
}

impl<S: DocumentStore> TripRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write a trip as a single document keyed by its id.
    ///
    /// Saving a trip whose id already exists replaces the stored document.
    pub async fn save(&self, trip: &PlannedTrip) -> Result<(), StorageError> {
        let document = serde_json::to_value(trip)?;

        self.store
            .put(TRIPS_COLLECTION, trip.trip_id.as_str(), document)
            .await
            .inspect_err(|e| {
                warn!(trip_id = %trip.trip_id, error = %e, "Failed to save trip");
            })?;

        info!(
            trip_id = %trip.trip_id,
            user_id = %trip.user_id,
            name = %trip.name,
            "Saved trip"
        );
        Ok(())
    }

    /// All trips owned by a user, ordered by trip id.
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<PlannedTrip>, StorageError> {
        let documents = self
            .store
            .find_eq(
                TRIPS_COLLECTION,
                "userId",
                &Value::String(user_id.as_str().to_string()),
            )
            .await
            .inspect_err(|e| {
                warn!(user_id = %user_id, error = %e, "Failed to list trips");
            })?;

        documents
            .into_iter()
            .map(|document| serde_json::from_value(document).map_err(StorageError::from))
            .collect()
    }

    pub async fn get(&self, trip_id: &TripId) -> Result<Option<PlannedTrip>, StorageError> {
        match self.store.get(TRIPS_COLLECTION, trip_id.as_str()).await? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    /// Remove a trip. Returns whether it existed.
    pub async fn delete(&self, trip_id: &TripId) -> Result<bool, StorageError> {
        let existed = self.store.delete(TRIPS_COLLECTION, trip_id.as_str()).await?;
        if existed {
            info!(trip_id = %trip_id, "Deleted trip");
        }
        Ok(existed)
    }
}
