//! Configuration for the telemetry adapter.

use std::time::Duration;

/// Default OpenSky Network REST API base URL.
pub const DEFAULT_API_URL: &str = "https://opensky-network.org/api";

/// Default cache validity window in seconds.
///
/// A record younger than this is returned without a network call; on expiry
/// the next lookup refetches.
pub const DEFAULT_CACHE_VALIDITY_SECS: u64 = 10;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Geographic bounding filter for full-feed queries.
///
/// Callsign lookups scan the whole feed; a bounding box keeps the payload
/// to the region the configured flights actually cross.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum latitude in degrees.
    pub lat_min: f64,

    /// Maximum latitude in degrees.
    pub lat_max: f64,

    /// Minimum longitude in degrees.
    pub lon_min: f64,

    /// Maximum longitude in degrees.
    pub lon_max: f64,
}

/// Configuration for the telemetry adapter and its client.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Base URL of the telemetry REST API.
    pub api_url: String,

    /// How long a fetched record stays fresh in the cache.
    pub cache_validity: Duration,

    /// HTTP timeout for a single feed request.
    pub request_timeout: Duration,

    /// Optional bounding filter for full-feed (callsign) queries.
    pub bounding_box: Option<BoundingBox>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            cache_validity: Duration::from_secs(DEFAULT_CACHE_VALIDITY_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            bounding_box: None,
        }
    }
}
