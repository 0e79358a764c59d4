//! Error types for the telemetry boundary.

use thiserror::Error;

/// Errors that can occur while querying the telemetry feed.
///
/// None of these escape the [`TelemetryAdapter`](super::TelemetryAdapter)
/// boundary; they are logged and collapsed into "absent".
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// HTTP request failed (connect, timeout, transfer).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Upstream returned a non-success status code.
    #[error("telemetry feed returned status {0}")]
    Status(u16),

    /// Response body was not valid JSON.
    #[error("failed to parse response: {0}")]
    Json(String),

    /// A state vector did not have the expected shape.
    #[error("malformed state vector: {0}")]
    MalformedStateVector(String),
}

impl From<reqwest::Error> for TelemetryError {
    fn from(e: reqwest::Error) -> Self {
        TelemetryError::Http(e.to_string())
    }
}

impl From<serde_json::Error> for TelemetryError {
    fn from(e: serde_json::Error) -> Self {
        TelemetryError::Json(e.to_string())
    }
}
