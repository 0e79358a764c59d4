//! Telemetry client trait and OpenSky Network implementation.
//!
//! The [`TelemetryClient`] trait abstracts over the upstream feed so the
//! adapter works with any source providing state vectors; tests substitute
//! mocks. [`OpenSkyClient`] queries the OpenSky Network REST API directly
//! via `reqwest`.

use std::future::Future;

use serde::Deserialize;
use serde_json::Value;

use super::config::TelemetryConfig;
use super::error::TelemetryError;
use super::record::StateVector;

/// Trait for fetching aircraft state vectors from a telemetry feed.
pub trait TelemetryClient: Send + Sync {
    /// Fetch state vectors for one airframe by ICAO 24-bit address.
    ///
    /// An empty result means no airborne report currently exists for that
    /// address; it is not an error.
    fn states_by_airframe(
        &self,
        airframe_id: &str,
    ) -> impl Future<Output = Result<Vec<StateVector>, TelemetryError>> + Send;

    /// Fetch all current state vectors (bounded by the configured region,
    /// if any). Used for callsign lookup, which has no server-side filter.
    fn all_states(&self) -> impl Future<Output = Result<Vec<StateVector>, TelemetryError>> + Send;
}

/// Top-level feed response.
///
/// `states` is null when the query matches nothing; we only deserialize the
/// array and decode each positional vector ourselves.
#[derive(Deserialize)]
struct StatesResponse {
    states: Option<Vec<Value>>,
}

/// OpenSky Network client using direct HTTP requests.
///
/// Uses a reusable `reqwest::Client` with connection pooling and the
/// configured request timeout.
pub struct OpenSkyClient {
    /// Reusable HTTP client.
    http: reqwest::Client,

    /// Adapter configuration (base URL, bounding box).
    config: TelemetryConfig,
}

impl OpenSkyClient {
    /// Create a client from telemetry configuration.
    pub fn new(config: TelemetryConfig) -> Result<Self, TelemetryError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TelemetryError::Http(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Issue a GET against `/states/all` with the given query parameters
    /// and decode the response into state vectors.
    async fn fetch_states(&self, query: &[(&str, String)]) -> Result<Vec<StateVector>, TelemetryError> {
        let url = format!("{}/states/all", self.config.api_url);
        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TelemetryError::Status(status.as_u16()));
        }

        let body: StatesResponse = serde_json::from_slice(&response.bytes().await?)?;
        let raw = body.states.unwrap_or_default();

        // Individual malformed vectors are dropped, not fatal for the batch
        let mut states = Vec::with_capacity(raw.len());
        for value in &raw {
            match StateVector::from_wire(value) {
                Ok(sv) => states.push(sv),
                Err(e) => {
                    tracing::debug!(error = %e, "Dropping malformed state vector");
                }
            }
        }

        tracing::trace!(total = states.len(), "Telemetry feed fetched");
        Ok(states)
    }
}

impl TelemetryClient for OpenSkyClient {
    async fn states_by_airframe(
        &self,
        airframe_id: &str,
    ) -> Result<Vec<StateVector>, TelemetryError> {
        let id = airframe_id.trim().to_ascii_lowercase();
        self.fetch_states(&[("icao24", id)]).await
    }

    async fn all_states(&self) -> Result<Vec<StateVector>, TelemetryError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(bb) = self.config.bounding_box {
            query.push(("lamin", bb.lat_min.to_string()));
            query.push(("lamax", bb.lat_max.to_string()));
            query.push(("lomin", bb.lon_min.to_string()));
            query.push(("lomax", bb.lon_max.to_string()));
        }
        self.fetch_states(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = OpenSkyClient::new(TelemetryConfig::default()).unwrap();
        assert_eq!(client.config.api_url, super::super::DEFAULT_API_URL);
    }

    #[test]
    fn test_states_response_null_states() {
        let body: StatesResponse = serde_json::from_str(r#"{"time": 1750872605, "states": null}"#)
            .unwrap();
        assert!(body.states.is_none());
    }

    #[test]
    fn test_states_response_with_vectors() {
        let body: StatesResponse = serde_json::from_value(json!({
            "time": 1750872605,
            "states": [
                ["a44360", "UAL881  ", "United States", 1750872600, 1750872605,
                 -95.3698, 49.1234, 10972.8, false, 250.5, 312.4, 0.0, null,
                 11100.0, null, false, 0]
            ]
        }))
        .unwrap();

        let raw = body.states.unwrap();
        assert_eq!(raw.len(), 1);
        let sv = StateVector::from_wire(&raw[0]).unwrap();
        assert_eq!(sv.icao24, "a44360");
    }
}
