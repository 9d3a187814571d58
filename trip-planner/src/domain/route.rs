//! Route types.
//!
//! A `Route` is one provider itinerary for a single travel mode, made of
//! legs between consecutive stops, each broken into steps.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::TravelMode;
use crate::polyline;

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a coordinate.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Travel mode reported for a single step.
///
/// Steps can carry modes with no route-level counterpart (a ferry crossing
/// inside a driving route, say); those are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepMode {
    Known(TravelMode),
    Other(String),
}

impl StepMode {
    /// Interprets a provider mode string, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        raw.parse()
            .map(StepMode::Known)
            .unwrap_or_else(|_| StepMode::Other(raw.to_string()))
    }

    /// The travel mode, if it is one the planner routes for.
    pub fn travel_mode(&self) -> Option<TravelMode> {
        match self {
            StepMode::Known(mode) => Some(*mode),
            StepMode::Other(_) => None,
        }
    }
}

impl fmt::Display for StepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepMode::Known(mode) => write!(f, "{mode}"),
            StepMode::Other(raw) => f.write_str(raw),
        }
    }
}

/// One instruction within a leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub distance_meters: u64,
    pub duration_seconds: u64,
    /// Instruction text as returned by the provider (may contain HTML).
    pub instructions: String,
    pub mode: StepMode,
    pub start: LatLng,
    pub end: LatLng,
}

/// One segment between consecutive stops (origin, waypoint or destination).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub start_address: String,
    pub end_address: String,
    pub steps: Vec<Step>,
}

/// A complete itinerary for one travel mode.
///
/// Routes produced by classification always have at least one leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub legs: Vec<Leg>,
    /// Encoded geometry of the whole route.
    pub overview_polyline: String,
    /// Order in which the provider visited the requested waypoints.
    ///
    /// The provider may reorder waypoints when asked to optimize; this is
    /// passed through untouched and never reconciled against the request.
    pub waypoint_order: Vec<usize>,
}

impl Route {
    /// Sum of all leg distances.
    pub fn total_distance_meters(&self) -> u64 {
        self.legs.iter().map(|leg| leg.distance_meters).sum()
    }

    /// Sum of all leg durations.
    pub fn total_duration_seconds(&self) -> u64 {
        self.legs.iter().map(|leg| leg.duration_seconds).sum()
    }

    /// Decoded overview geometry.
    ///
    /// A malformed polyline yields an empty path: the route stays usable,
    /// it just has no geometry to draw.
    pub fn geometry(&self) -> Vec<LatLng> {
        match polyline::decode(&self.overview_polyline) {
            Ok(points) => points,
            Err(e) => {
                warn!(error = %e, "Malformed overview polyline, no geometry available");
                Vec::new()
            }
        }
    }

    /// Whether the provider visited the waypoints in a different order
    /// from the one requested.
    pub fn waypoints_reordered(&self) -> bool {
        self.waypoint_order
            .iter()
            .enumerate()
            .any(|(position, &index)| position != index)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn leg(distance_meters: u64, duration_seconds: u64) -> Leg {
        Leg {
            distance_meters,
            duration_seconds,
            start_address: "Start".to_string(),
            end_address: "End".to_string(),
            steps: vec![Step {
                distance_meters,
                duration_seconds,
                instructions: "Head <b>north</b>".to_string(),
                mode: StepMode::Known(TravelMode::Driving),
                start: LatLng::new(38.5, -120.2),
                end: LatLng::new(40.7, -120.95),
            }],
        }
    }

    pub fn route(legs: Vec<Leg>) -> Route {
        Route {
            legs,
            overview_polyline: "_p~iF~ps|U_ulLnnqC_mqNvxq`@".to_string(),
            waypoint_order: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{leg, route};
    use super::*;

    #[test]
    fn totals_sum_legs() {
        let route = route(vec![leg(1200, 300), leg(800, 150)]);
        assert_eq!(route.total_distance_meters(), 2000);
        assert_eq!(route.total_duration_seconds(), 450);
    }

    #[test]
    fn geometry_decodes_overview() {
        let route = route(vec![leg(1, 1)]);
        let points = route.geometry();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], LatLng::new(38.5, -120.2));
    }

    #[test]
    fn malformed_geometry_degrades_to_empty() {
        let mut route = route(vec![leg(1, 1)]);
        route.overview_polyline = "_p~iF".to_string();
        assert!(route.geometry().is_empty());
    }

    #[test]
    fn waypoint_reordering_detected() {
        let mut route = route(vec![leg(1, 1)]);
        assert!(!route.waypoints_reordered());

        route.waypoint_order = vec![0, 1, 2];
        assert!(!route.waypoints_reordered());

        route.waypoint_order = vec![1, 0, 2];
        assert!(route.waypoints_reordered());
    }

    #[test]
    fn step_mode_keeps_unknown_values() {
        assert_eq!(StepMode::parse("DRIVING"), StepMode::Known(TravelMode::Driving));
        assert_eq!(StepMode::parse("transit").travel_mode(), Some(TravelMode::Transit));

        let ferry = StepMode::parse("FERRY");
        assert_eq!(ferry, StepMode::Other("FERRY".to_string()));
        assert_eq!(ferry.travel_mode(), None);
        assert_eq!(ferry.to_string(), "FERRY");
    }
}
