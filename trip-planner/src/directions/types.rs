//! Directions API response DTOs.
//!
//! These types map directly to the provider's JSON. Fields the provider
//! omits on some statuses (routes on errors, steps on sparse legs) default
//! to empty rather than failing deserialization.

use serde::{Deserialize, Serialize};

/// Top-level directions response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsResponse {
    /// Provider status, e.g. `"OK"`, `"ZERO_RESULTS"`, `"INVALID_REQUEST"`.
    pub status: String,

    /// Candidate routes; the first is the provider's preferred one.
    #[serde(default)]
    pub routes: Vec<RouteDto>,

    /// Human-readable detail accompanying non-`OK` statuses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DirectionsResponse {
    /// A response with the given status and no routes.
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            routes: Vec::new(),
            error_message: None,
        }
    }

    /// An `OK` response carrying the given routes.
    pub fn ok(routes: Vec<RouteDto>) -> Self {
        Self {
            status: "OK".to_string(),
            routes,
            error_message: None,
        }
    }
}

/// One route in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDto {
    pub overview_polyline: PolylineDto,

    #[serde(default)]
    pub legs: Vec<LegDto>,

    /// Short description of the route, e.g. the main road taken.
    #[serde(default)]
    pub summary: String,

    /// Visiting order of the requested waypoints when optimization applied.
    #[serde(default)]
    pub waypoint_order: Vec<usize>,
}

/// Encoded geometry wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineDto {
    pub points: String,
}

/// One leg of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegDto {
    pub distance: TextValue,
    pub duration: TextValue,

    #[serde(default)]
    pub start_address: String,

    #[serde(default)]
    pub end_address: String,

    #[serde(default)]
    pub steps: Vec<StepDto>,
}

/// One step of a leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDto {
    pub distance: TextValue,
    pub duration: TextValue,

    #[serde(default)]
    pub html_instructions: String,

    pub start_location: LatLngDto,
    pub end_location: LatLngDto,

    /// Uppercase mode name, e.g. `"WALKING"`.
    pub travel_mode: String,
}

/// A display string paired with its numeric value.
///
/// Distances are in meters, durations in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextValue {
    #[serde(default)]
    pub text: String,
    pub value: u64,
}

/// A coordinate as the provider spells it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngDto {
    pub lat: f64,
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_response() {
        let json = r#"{
            "status": "OK",
            "geocoded_waypoints": [],
            "routes": [{
                "summary": "I-80 W",
                "waypoint_order": [1, 0],
                "overview_polyline": { "points": "_p~iF~ps|U" },
                "legs": [{
                    "distance": { "text": "1.2 km", "value": 1200 },
                    "duration": { "text": "5 mins", "value": 300 },
                    "start_address": "A St",
                    "end_address": "B St",
                    "steps": [{
                        "distance": { "text": "1.2 km", "value": 1200 },
                        "duration": { "text": "5 mins", "value": 300 },
                        "html_instructions": "Head <b>west</b>",
                        "start_location": { "lat": 38.5, "lng": -120.2 },
                        "end_location": { "lat": 40.7, "lng": -120.95 },
                        "travel_mode": "DRIVING"
                    }]
                }]
            }]
        }"#;

        let response: DirectionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "OK");
        assert_eq!(response.routes.len(), 1);

        let route = &response.routes[0];
        assert_eq!(route.waypoint_order, vec![1, 0]);
        assert_eq!(route.legs[0].distance.value, 1200);
        assert_eq!(route.legs[0].steps[0].travel_mode, "DRIVING");
    }

    #[test]
    fn error_status_without_routes() {
        let json = r#"{ "status": "INVALID_REQUEST", "error_message": "waypoints not supported" }"#;
        let response: DirectionsResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.status, "INVALID_REQUEST");
        assert!(response.routes.is_empty());
        assert_eq!(
            response.error_message.as_deref(),
            Some("waypoints not supported")
        );
    }
}
