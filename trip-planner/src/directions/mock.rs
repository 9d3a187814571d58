//! Mock directions client for testing without API access.
//!
//! Serves canned per-mode replies, either registered in code or loaded
//! from a directory of JSON responses, and records every query it sees.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::RwLock;

use crate::domain::TravelMode;

use super::error::DirectionsError;
use super::provider::{DirectionsProvider, DirectionsQuery};
use super::types::DirectionsResponse;

/// What the mock answers for a given mode.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this response
    Respond(DirectionsResponse),
    /// Return this response after a delay
    Delayed(Duration, DirectionsResponse),
    /// Fail as if the network had failed
    TransportFailure(String),
    /// Panic inside the request future
    Panic,
}

/// Mock directions client that serves canned replies per travel mode.
#[derive(Clone, Default)]
pub struct MockDirectionsClient {
    replies: Arc<RwLock<HashMap<TravelMode, MockReply>>>,
    queries: Arc<Mutex<Vec<DirectionsQuery>>>,
}

impl MockDirectionsClient {
    /// Create a mock with no replies registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock by loading JSON responses from a directory.
    ///
    /// Expects files named after the mode (e.g. `driving.json`,
    /// `transit.json`). Modes without a file have no reply.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, DirectionsError> {
        let data_dir = data_dir.as_ref();
        let mut replies = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            DirectionsError::InvalidConfig(format!("Failed to read mock data directory: {}", e))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                DirectionsError::InvalidConfig(format!("Failed to read directory entry: {}", e))
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let Some(mode) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<TravelMode>().ok())
            else {
                continue;
            };

            let json = std::fs::read_to_string(&path).map_err(|e| {
                DirectionsError::InvalidConfig(format!("Failed to read {:?}: {}", path, e))
            })?;

            let response: DirectionsResponse =
                serde_json::from_str(&json).map_err(|e| DirectionsError::Json {
                    message: format!("Failed to parse {:?}: {}", path, e),
                    body: None,
                })?;

            replies.insert(mode, MockReply::Respond(response));
        }

        if replies.is_empty() {
            return Err(DirectionsError::InvalidConfig(format!(
                "No mock response files found in {:?}",
                data_dir
            )));
        }

        Ok(Self {
            replies: Arc::new(RwLock::new(replies)),
            queries: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Register the reply for a mode, replacing any previous one.
    pub async fn set_reply(&self, mode: TravelMode, reply: MockReply) {
        self.replies.write().await.insert(mode, reply);
    }

    /// Register a plain response for a mode.
    pub async fn respond(&self, mode: TravelMode, response: DirectionsResponse) {
        self.set_reply(mode, MockReply::Respond(response)).await;
    }

    /// Queries received so far, in arrival order.
    pub fn queries(&self) -> Vec<DirectionsQuery> {
        self.query_log().clone()
    }

    /// Number of queries received so far.
    pub fn query_count(&self) -> usize {
        self.query_log().len()
    }

    fn record(&self, query: &DirectionsQuery) {
        self.query_log().push(query.clone());
    }

    /// The query log, still usable after a panic while it was held.
    fn query_log(&self) -> MutexGuard<'_, Vec<DirectionsQuery>> {
        self.queries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the canned reply for a query's mode.
    pub async fn get_directions(
        &self,
        query: &DirectionsQuery,
    ) -> Result<DirectionsResponse, DirectionsError> {
        self.record(query);

        let reply = self.replies.read().await.get(&query.mode).cloned();

        match reply {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Delayed(delay, response)) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            Some(MockReply::TransportFailure(message)) => Err(DirectionsError::Api {
                status: 503,
                message,
            }),
            Some(MockReply::Panic) => panic!("mock directions client asked to panic"),
            None => Err(DirectionsError::Api {
                status: 404,
                message: format!("No mock reply for mode {}", query.mode),
            }),
        }
    }
}

impl DirectionsProvider for MockDirectionsClient {
    async fn get_directions(
        &self,
        query: &DirectionsQuery,
    ) -> Result<DirectionsResponse, DirectionsError> {
        MockDirectionsClient::get_directions(self, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(mode: TravelMode) -> DirectionsQuery {
        DirectionsQuery {
            origin: "place_id:X".to_string(),
            destination: "place_id:Y".to_string(),
            waypoints: None,
            mode,
        }
    }

    #[tokio::test]
    async fn load_fixture_directory() {
        let client = MockDirectionsClient::from_dir("data/fixtures").unwrap();

        let driving = client.get_directions(&query(TravelMode::Driving)).await.unwrap();
        assert_eq!(driving.status, "OK");
        assert!(!driving.routes.is_empty());

        let transit = client.get_directions(&query(TravelMode::Transit)).await.unwrap();
        assert_eq!(transit.status, "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn missing_directory_is_error() {
        assert!(MockDirectionsClient::from_dir("data/does-not-exist").is_err());
    }

    #[tokio::test]
    async fn unregistered_mode_fails() {
        let client = MockDirectionsClient::new();
        let result = client.get_directions(&query(TravelMode::Walking)).await;
        assert!(matches!(result, Err(DirectionsError::Api { status: 404, .. })));
    }

    #[tokio::test]
    async fn records_queries() {
        let client = MockDirectionsClient::new();
        client
            .respond(TravelMode::Driving, DirectionsResponse::with_status("ZERO_RESULTS"))
            .await;

        let _ = client.get_directions(&query(TravelMode::Driving)).await;
        let _ = client.get_directions(&query(TravelMode::Walking)).await;

        let modes: Vec<_> = client.queries().iter().map(|q| q.mode).collect();
        assert_eq!(modes, vec![TravelMode::Driving, TravelMode::Walking]);
        assert_eq!(client.query_count(), 2);
    }

    #[tokio::test]
    async fn query_log_survives_poisoned_lock() {
        let client = MockDirectionsClient::new();
        let _ = client.get_directions(&query(TravelMode::Driving)).await;

        let poisoner = client.clone();
        let result = std::thread::spawn(move || {
            let _guard = poisoner.queries.lock().unwrap();
            panic!("poison the query log");
        })
        .join();
        assert!(result.is_err());
        assert!(client.queries.is_poisoned());

        let _ = client.get_directions(&query(TravelMode::Walking)).await;

        let modes: Vec<_> = client.queries().iter().map(|q| q.mode).collect();
        assert_eq!(modes, vec![TravelMode::Driving, TravelMode::Walking]);
        assert_eq!(client.query_count(), 2);
    }
}
