//! The directions provider seam.

use std::future::Future;

use crate::domain::{PlaceId, TravelMode};

use super::error::DirectionsError;
use super::types::DirectionsResponse;

/// Hint prefixed to the waypoint list asking the provider to pick the
/// visiting order.
const OPTIMIZE_HINT: &str = "optimize:true";

/// One directions request: a single (origin, destination, waypoints, mode)
/// tuple, already rendered into provider parameter strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectionsQuery {
    pub origin: String,
    pub destination: String,
    /// Pipe-delimited waypoint references, `None` when there are none.
    pub waypoints: Option<String>,
    pub mode: TravelMode,
}

impl DirectionsQuery {
    /// Build a query between place ids.
    ///
    /// Waypoints keep the caller's order and are not de-duplicated.
    pub fn between_places(
        origin: &PlaceId,
        destination: &PlaceId,
        waypoints: &[PlaceId],
        mode: TravelMode,
    ) -> Self {
        Self {
            origin: origin.as_provider_ref(),
            destination: destination.as_provider_ref(),
            waypoints: waypoints_param(waypoints),
            mode,
        }
    }

    /// Query parameters, excluding the API key.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("origin", self.origin.clone()),
            ("destination", self.destination.clone()),
        ];
        if let Some(waypoints) = &self.waypoints {
            params.push(("waypoints", waypoints.clone()));
        }
        params.push(("mode", self.mode.as_str().to_string()));
        params
    }
}

/// Render the waypoint parameter: `optimize:true|place_id:A|place_id:B`.
fn waypoints_param(waypoints: &[PlaceId]) -> Option<String> {
    if waypoints.is_empty() {
        return None;
    }

    let refs = waypoints
        .iter()
        .map(PlaceId::as_provider_ref)
        .collect::<Vec<_>>()
        .join("|");

    Some(format!("{OPTIMIZE_HINT}|{refs}"))
}

/// Source of directions responses.
///
/// This abstraction lets the aggregator run against the HTTP client, a
/// caching wrapper, or canned responses in tests.
pub trait DirectionsProvider {
    /// Perform one directions request.
    ///
    /// A response with a non-`OK` status is still `Ok` here; only
    /// transport failures are errors.
    fn get_directions(
        &self,
        query: &DirectionsQuery,
    ) -> impl Future<Output = Result<DirectionsResponse, DirectionsError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> PlaceId {
        PlaceId::parse(s).unwrap()
    }

    #[test]
    fn no_waypoints_omits_param() {
        let query = DirectionsQuery::between_places(&id("X"), &id("Y"), &[], TravelMode::Transit);

        assert_eq!(query.origin, "place_id:X");
        assert_eq!(query.destination, "place_id:Y");
        assert_eq!(query.waypoints, None);
        assert_eq!(
            query.params(),
            vec![
                ("origin", "place_id:X".to_string()),
                ("destination", "place_id:Y".to_string()),
                ("mode", "transit".to_string()),
            ]
        );
    }

    #[test]
    fn waypoints_keep_caller_order() {
        let waypoints = [id("C"), id("A"), id("B")];
        let query =
            DirectionsQuery::between_places(&id("X"), &id("Y"), &waypoints, TravelMode::Driving);

        assert_eq!(
            query.waypoints.as_deref(),
            Some("optimize:true|place_id:C|place_id:A|place_id:B")
        );
    }

    #[test]
    fn duplicate_waypoints_are_kept() {
        let waypoints = [id("A"), id("A")];
        let query =
            DirectionsQuery::between_places(&id("X"), &id("Y"), &waypoints, TravelMode::Walking);

        assert_eq!(
            query.waypoints.as_deref(),
            Some("optimize:true|place_id:A|place_id:A")
        );
    }
}
