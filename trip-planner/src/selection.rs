//! In-progress trip selection.
//!
//! Holds the origin, destination and waypoints the user has picked so
//! far. The state is a shared handle so a UI layer and a background fetch
//! can both hold it; no validation is done here, the picker upstream is
//! responsible for keeping endpoints out of the waypoint list.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::aggregator::RouteRequest;
use crate::domain::PlaceRef;

/// Snapshot of a selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripSelection {
    /// Origin and destination, always replaced together.
    pub endpoints: Option<(PlaceRef, PlaceRef)>,
    /// Intermediate stops in visiting order.
    pub waypoints: Vec<PlaceRef>,
}

impl TripSelection {
    pub fn origin(&self) -> Option<&PlaceRef> {
        self.endpoints.as_ref().map(|(origin, _)| origin)
    }

    pub fn destination(&self) -> Option<&PlaceRef> {
        self.endpoints.as_ref().map(|(_, destination)| destination)
    }
}

/// Thread-safe selection state.
///
/// Clones share the same underlying selection.
#[derive(Clone, Default)]
pub struct TripSelectionState {
    inner: Arc<RwLock<TripSelection>>,
}

impl TripSelectionState {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace origin and destination as a pair.
    ///
    /// Both change under one write lock, so readers never see a new origin
    /// with an old destination.
    pub async fn set_endpoints(&self, origin: PlaceRef, destination: PlaceRef) {
        let mut guard = self.inner.write().await;
        guard.endpoints = Some((origin, destination));
    }

    /// Replace the waypoint list.
    pub async fn set_waypoints(&self, waypoints: Vec<PlaceRef>) {
        let mut guard = self.inner.write().await;
        guard.waypoints = waypoints;
    }

    /// Reset to an empty selection.
    pub async fn clear(&self) {
        let mut guard = self.inner.write().await;
        *guard = TripSelection::default();
    }

    pub async fn origin(&self) -> Option<PlaceRef> {
        let guard = self.inner.read().await;
        guard.origin().cloned()
    }

    pub async fn destination(&self) -> Option<PlaceRef> {
        let guard = self.inner.read().await;
        guard.destination().cloned()
    }

    pub async fn waypoints(&self) -> Vec<PlaceRef> {
        let guard = self.inner.read().await;
        guard.waypoints.clone()
    }

    /// Copy of the whole selection, consistent at the time of the call.
    pub async fn snapshot(&self) -> TripSelection {
        let guard = self.inner.read().await;
        guard.clone()
    }

    /// Route request for the current selection, if both endpoints are set.
    pub async fn route_request(&self) -> Option<RouteRequest> {
        let guard = self.inner.read().await;
        RouteRequest::from_selection(&guard)
    }
}
