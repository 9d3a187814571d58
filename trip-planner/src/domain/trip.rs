//! Planned trip types.
//!
//! A `PlannedTrip` is the persisted snapshot of a selection plus the
//! route the user picked. It is created once and never mutated; saving
//! the same selection again produces a new trip with a new id.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{DomainError, PlaceRef, Route};
use crate::selection::TripSelection;

/// Unique trip identifier, also used as the storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        TripId(uuid::Uuid::new_v4().to_string())
    }

    /// Wraps an existing id.
    pub fn new(id: impl Into<String>) -> Self {
        TripId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the user who owns a trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user id, rejecting blank input.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::EmptyUserId);
        }
        Ok(UserId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Summary of the chosen route stored alongside a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub encoded_polyline: String,
}

impl RouteInfo {
    /// Summarises a route: leg totals plus the overview geometry.
    pub fn from_route(route: &Route) -> Self {
        Self {
            distance_meters: route.total_distance_meters(),
            duration_seconds: route.total_duration_seconds(),
            encoded_polyline: route.overview_polyline.clone(),
        }
    }
}

/// A saved trip plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedTrip {
    pub trip_id: TripId,
    pub user_id: UserId,
    pub name: String,
    pub origin: PlaceRef,
    pub destination: PlaceRef,
    #[serde(default)]
    pub waypoints: Vec<PlaceRef>,
    #[serde(default)]
    pub route_info: Option<RouteInfo>,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

impl PlannedTrip {
    /// Assembles a new trip from the current selection and the chosen route.
    ///
    /// A blank `name` falls back to `"<origin> to <destination>"`. The
    /// route is optional: a trip can be saved even when no mode returned
    /// a route.
    pub fn from_selection(
        selection: &TripSelection,
        route: Option<&Route>,
        user_id: UserId,
        name: &str,
    ) -> Result<Self, DomainError> {
        let (origin, destination) = selection
            .endpoints
            .clone()
            .ok_or(DomainError::MissingEndpoints)?;

        let name = match name.trim() {
            "" => default_name(&origin, &destination),
            given => given.to_string(),
        };

        Ok(Self {
            trip_id: TripId::generate(),
            user_id,
            name,
            origin,
            destination,
            waypoints: selection.waypoints.clone(),
            route_info: route.map(RouteInfo::from_route),
            created_at: Utc::now().timestamp_millis(),
        })
    }
}

fn default_name(origin: &PlaceRef, destination: &PlaceRef) -> String {
    format!("{} to {}", origin.name, destination.name)
}
