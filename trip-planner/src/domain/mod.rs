//! Domain types for the trip planner.
//!
//! Identifiers validate their invariants at construction time, so code
//! that receives them can trust their validity.

mod error;
mod mode;
mod place;
mod route;
mod trip;

pub use error::DomainError;
pub use mode::{InvalidTravelMode, TravelMode};
pub use place::{InvalidPlaceId, PlaceId, PlaceRef};
pub use route::{LatLng, Leg, Route, Step, StepMode};
pub use trip::{PlannedTrip, RouteInfo, TripId, UserId};

#[cfg(test)]
pub(crate) use route::fixtures;
