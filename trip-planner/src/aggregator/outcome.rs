//! Per-mode route outcomes and provider status classification.

use tracing::debug;

use crate::directions::{DirectionsResponse, convert_route};
use crate::domain::Route;

/// Why a mode has no route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Provider found no path for this mode
    #[error("no route found")]
    NoRoute,

    /// Request shape rejected for this mode (e.g. transit with waypoints)
    #[error("request not supported for this mode")]
    UnsupportedForMode,

    /// Unrecognised provider status, with the provider's message if any
    #[error("provider error: {0}")]
    ProviderError(String),

    /// Network, I/O or timeout failure
    #[error("transport error: {0}")]
    Transport(String),
}

impl RouteError {
    /// Whether this is an ordinary "not available for this mode" answer
    /// rather than a failure worth reporting.
    pub fn is_expected(&self) -> bool {
        matches!(self, RouteError::NoRoute | RouteError::UnsupportedForMode)
    }
}

/// Result of fetching a route for one mode: a route or a classified error.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Route(Route),
    Failed(RouteError),
}

impl RouteOutcome {
    /// The route, if this mode has one.
    pub fn route(&self) -> Option<&Route> {
        match self {
            RouteOutcome::Route(route) => Some(route),
            RouteOutcome::Failed(_) => None,
        }
    }

    /// The error, if this mode failed.
    pub fn error(&self) -> Option<&RouteError> {
        match self {
            RouteOutcome::Route(_) => None,
            RouteOutcome::Failed(e) => Some(e),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, RouteOutcome::Route(_))
    }

    pub fn into_result(self) -> Result<Route, RouteError> {
        match self {
            RouteOutcome::Route(route) => Ok(route),
            RouteOutcome::Failed(e) => Err(e),
        }
    }
}

impl From<Result<Route, RouteError>> for RouteOutcome {
    fn from(result: Result<Route, RouteError>) -> Self {
        match result {
            Ok(route) => RouteOutcome::Route(route),
            Err(e) => RouteOutcome::Failed(e),
        }
    }
}

/// Classify a provider response into an outcome.
///
/// Only the first route is used; alternatives are ignored. An `OK`
/// response whose first route has no legs is treated as no route. For
/// unrecognised statuses the provider's `error_message`, when present, is
/// kept alongside the status.
pub fn classify(response: &DirectionsResponse) -> RouteOutcome {
    match response.status.as_str() {
        "OK" => {
            let Some(first) = response.routes.first() else {
                return RouteOutcome::Failed(RouteError::NoRoute);
            };

            let route = convert_route(first);
            if route.legs.is_empty() {
                return RouteOutcome::Failed(RouteError::NoRoute);
            }
            RouteOutcome::Route(route)
        }
        "ZERO_RESULTS" => RouteOutcome::Failed(RouteError::NoRoute),
        "INVALID_REQUEST" => {
            if let Some(message) = &response.error_message {
                debug!(%message, "Request rejected by provider");
            }
            RouteOutcome::Failed(RouteError::UnsupportedForMode)
        }
        other => {
            let detail = match &response.error_message {
                Some(message) => format!("{other}: {message}"),
                None => other.to_string(),
            };
            RouteOutcome::Failed(RouteError::ProviderError(detail))
        }
    }
}
