//! Route aggregation across travel modes.
//!
//! Given an origin, destination and waypoints, the aggregator asks the
//! directions provider for a route in every supported mode at once and
//! returns one outcome per mode. Failures are contained per mode: they
//! surface as [`RouteError`] values, never as an error for the whole call.

mod config;
mod fetch;
mod outcome;

pub use config::AggregatorConfig;
pub use fetch::{ModeRoutes, RouteAggregator, RouteRequest};
pub use outcome::{RouteError, RouteOutcome, classify};
