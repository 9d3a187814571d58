//! Multi-mode trip planner.
//!
//! Given an origin, a destination and optional waypoints, fetches a route
//! for every travel mode at once, lets the caller compare them, and saves
//! the chosen plan as a trip.

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod directions;
pub mod domain;
pub mod places;
pub mod polyline;
pub mod selection;
pub mod store;
