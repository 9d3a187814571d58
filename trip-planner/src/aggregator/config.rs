//! Aggregator configuration.

use std::time::Duration;

/// Configuration for route aggregation.
#[derive(Debug, Clone, Default)]
pub struct AggregatorConfig {
    /// Upper bound on each per-mode request.
    ///
    /// `None` waits for as long as the client does. A mode that exceeds
    /// the limit is reported as a transport failure; other modes are
    /// unaffected.
    pub request_timeout: Option<Duration>,
}

impl AggregatorConfig {
    /// Create a configuration with no per-request timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}
