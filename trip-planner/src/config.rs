//! Planner configuration from environment.
//!
//! Everything is read once at startup into a `PlannerConfig`, which the
//! binary then hands to the client, aggregator and repository
//! constructors.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::aggregator::AggregatorConfig;
use crate::cache::CacheConfig;
use crate::directions::DirectionsConfig;

pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";
pub const BASE_URL_VAR: &str = "DIRECTIONS_BASE_URL";
pub const TIMEOUT_VAR: &str = "DIRECTIONS_TIMEOUT_SECS";
pub const MAX_CONCURRENT_VAR: &str = "DIRECTIONS_MAX_CONCURRENT";
pub const MOCK_DIR_VAR: &str = "DIRECTIONS_MOCK_DIR";
pub const REQUEST_TIMEOUT_VAR: &str = "ROUTE_REQUEST_TIMEOUT_SECS";
pub const CACHE_TTL_VAR: &str = "DIRECTIONS_CACHE_TTL_SECS";
pub const STORE_DIR_VAR: &str = "TRIP_STORE_DIR";
pub const SAVED_PLACES_VAR: &str = "SAVED_PLACES_FILE";

/// Default directory for saved trips, relative to the working directory.
const DEFAULT_STORE_DIR: &str = "trip_store";

/// Errors in environment configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Where directions come from.
#[derive(Debug, Clone)]
pub enum DirectionsSource {
    /// The live HTTP API
    Http(DirectionsConfig),
    /// Canned responses loaded from a directory of `<mode>.json` files
    Mock(PathBuf),
}

/// Complete planner configuration.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub directions: DirectionsSource,
    pub aggregator: AggregatorConfig,
    pub cache: CacheConfig,
    /// Root directory of the file-backed trip store
    pub store_dir: PathBuf,
    /// JSON list of saved places used to resolve place ids
    pub saved_places_file: Option<PathBuf>,
}

impl PlannerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// The API key is required unless a mock directory is configured.
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let directions = match get(MOCK_DIR_VAR) {
            Some(dir) => DirectionsSource::Mock(PathBuf::from(dir)),
            None => {
                let api_key = get(API_KEY_VAR).ok_or(ConfigError::Missing(API_KEY_VAR))?;
                let mut config = DirectionsConfig::new(api_key);

                if let Some(url) = get(BASE_URL_VAR) {
                    config = config.with_base_url(url);
                }
                if let Some(secs) = parse_var::<u64>(&get, TIMEOUT_VAR)? {
                    config = config.with_timeout(secs);
                }
                if let Some(n) = parse_var::<usize>(&get, MAX_CONCURRENT_VAR)? {
                    if n == 0 {
                        return Err(ConfigError::Invalid {
                            key: MAX_CONCURRENT_VAR,
                            value: n.to_string(),
                        });
                    }
                    config = config.with_max_concurrent(n);
                }

                DirectionsSource::Http(config)
            }
        };

        let mut aggregator = AggregatorConfig::new();
        if let Some(secs) = parse_var::<u64>(&get, REQUEST_TIMEOUT_VAR)? {
            aggregator = aggregator.with_request_timeout(Duration::from_secs(secs));
        }

        let mut cache = CacheConfig::default();
        if let Some(secs) = parse_var::<u64>(&get, CACHE_TTL_VAR)? {
            cache.ttl = Duration::from_secs(secs);
        }

        Ok(Self {
            directions,
            aggregator,
            cache,
            store_dir: get(STORE_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR)),
            saved_places_file: get(SAVED_PLACES_VAR).map(PathBuf::from),
        })
    }
}

fn parse_var<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match get(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
