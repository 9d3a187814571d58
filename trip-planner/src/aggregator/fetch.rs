//! Concurrent per-mode route fetching.
//!
//! One request per travel mode is issued at once and all of them are
//! awaited before returning. A mode's failure, timeout or panic becomes an
//! outcome for that mode alone; siblings run to completion regardless.

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::join_all;
use tracing::{debug, info};

use crate::directions::{DirectionsProvider, DirectionsQuery};
use crate::domain::{PlaceId, Route, TravelMode};
use crate::selection::TripSelection;

use super::config::AggregatorConfig;
use super::outcome::{RouteError, RouteOutcome, classify};

/// Inputs for one aggregation, captured by value at call time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteRequest {
    pub origin: PlaceId,
    pub destination: PlaceId,
    pub waypoints: Vec<PlaceId>,
}

impl RouteRequest {
    /// Create a new route request.
    pub fn new(origin: PlaceId, destination: PlaceId, waypoints: Vec<PlaceId>) -> Self {
        Self {
            origin,
            destination,
            waypoints,
        }
    }

    /// Build a request from a selection, if both endpoints are chosen.
    pub fn from_selection(selection: &TripSelection) -> Option<Self> {
        let (origin, destination) = selection.endpoints.as_ref()?;
        Some(Self::new(
            origin.id.clone(),
            destination.id.clone(),
            selection.waypoints.iter().map(|w| w.id.clone()).collect(),
        ))
    }

    /// The provider query for one mode.
    pub fn query_for(&self, mode: TravelMode) -> DirectionsQuery {
        DirectionsQuery::between_places(&self.origin, &self.destination, &self.waypoints, mode)
    }
}

/// Outcome for every travel mode, plus the request that produced them.
///
/// Always holds exactly one entry per mode in [`TravelMode::ALL`].
#[derive(Debug, Clone)]
pub struct ModeRoutes {
    request: RouteRequest,
    outcomes: BTreeMap<TravelMode, RouteOutcome>,
}

impl ModeRoutes {
    /// The request these outcomes answer.
    ///
    /// Callers that start a new aggregation before an older one finishes
    /// compare this against their latest request to discard stale results.
    pub fn request(&self) -> &RouteRequest {
        &self.request
    }

    /// Outcome for a mode.
    pub fn get(&self, mode: TravelMode) -> Option<&RouteOutcome> {
        self.outcomes.get(&mode)
    }

    /// Route for a mode, if it has one.
    pub fn route(&self, mode: TravelMode) -> Option<&Route> {
        self.get(mode).and_then(RouteOutcome::route)
    }

    /// All outcomes in mode order.
    pub fn iter(&self) -> impl Iterator<Item = (TravelMode, &RouteOutcome)> {
        self.outcomes.iter().map(|(mode, outcome)| (*mode, outcome))
    }

    /// Modes that returned a route.
    pub fn available_modes(&self) -> Vec<TravelMode> {
        self.iter()
            .filter(|(_, outcome)| outcome.is_available())
            .map(|(mode, _)| mode)
            .collect()
    }

    /// The first mode, in presentation order, that has a route.
    pub fn first_available(&self) -> Option<(TravelMode, &Route)> {
        self.iter()
            .find_map(|(mode, outcome)| outcome.route().map(|route| (mode, route)))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Fetches routes for every travel mode concurrently.
///
/// Holds no state between calls; each call is an independent fan-out.
/// Dropping the returned future cancels all of its in-flight requests.
pub struct RouteAggregator<P> {
    provider: P,
    config: AggregatorConfig,
}

impl<P: DirectionsProvider> RouteAggregator<P> {
    /// Create a new aggregator over the given provider.
    pub fn new(provider: P, config: AggregatorConfig) -> Self {
        Self { provider, config }
    }

    /// Access the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetch one route per mode and wait for all of them.
    pub async fn fetch_all_modes(&self, request: &RouteRequest) -> ModeRoutes {
        let futures: Vec<_> = TravelMode::ALL
            .iter()
            .map(|&mode| self.fetch_mode(request, mode))
            .collect();

        // join_all yields results in input order, so zipping with ALL
        // pairs every mode with its own outcome.
        let results = join_all(futures).await;
        let outcomes: BTreeMap<_, _> = TravelMode::ALL.into_iter().zip(results).collect();

        let available = outcomes.values().filter(|o| o.is_available()).count();
        info!(
            origin = %request.origin,
            destination = %request.destination,
            waypoints = request.waypoints.len(),
            available,
            failed = outcomes.len() - available,
            "Route aggregation complete"
        );

        ModeRoutes {
            request: request.clone(),
            outcomes,
        }
    }

    async fn fetch_mode(&self, request: &RouteRequest, mode: TravelMode) -> RouteOutcome {
        let query = request.query_for(mode);
        let call = AssertUnwindSafe(self.provider.get_directions(&query)).catch_unwind();

        let caught = match self.config.request_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(caught) => caught,
                Err(_) => {
                    debug!(%mode, timeout_ms = limit.as_millis() as u64, "Directions request timed out");
                    return RouteOutcome::Failed(RouteError::Transport(format!(
                        "timed out after {}ms",
                        limit.as_millis()
                    )));
                }
            },
            None => call.await,
        };

        let outcome = match caught {
            Ok(Ok(response)) => classify(&response),
            Ok(Err(e)) => RouteOutcome::Failed(RouteError::Transport(e.to_string())),
            Err(_) => RouteOutcome::Failed(RouteError::Transport(
                "directions request panicked".to_string(),
            )),
        };

        match &outcome {
            RouteOutcome::Route(route) => debug!(
                %mode,
                legs = route.legs.len(),
                distance_m = route.total_distance_meters(),
                "Route available"
            ),
            RouteOutcome::Failed(e) => debug!(%mode, error = %e, "Route unavailable"),
        }

        outcome
    }
}
