//! Directions provider client.
//!
//! This module provides an HTTP client for the maps directions API plus
//! a mock for offline use. Both implement [`DirectionsProvider`], the seam
//! the route aggregator is written against.
//!
//! Key characteristics of the provider:
//! - Places are referenced as `place_id:<id>`
//! - Waypoints travel as one pipe-delimited parameter, optionally led by
//!   `optimize:true`, which lets the provider reorder them
//! - Failures such as "no route" arrive as HTTP 200 with a status string,
//!   so transport errors and provider statuses are reported separately

mod client;
mod convert;
mod error;
mod mock;
mod provider;
mod types;

pub use client::{DEFAULT_BASE_URL, DirectionsClient, DirectionsConfig};
pub use convert::convert_route;
pub use error::DirectionsError;
pub use mock::{MockDirectionsClient, MockReply};
pub use provider::{DirectionsProvider, DirectionsQuery};
pub use types::{
    DirectionsResponse, LatLngDto, LegDto, PolylineDto, RouteDto, StepDto, TextValue,
};
