//! Bounded tracking error log.
//!
//! Every recoverable failure in the tracker appends here: configuration
//! rejects at load, telemetry failures, invalid live data. The log is
//! advisory and never blocks tracking; it is exposed read-only to the
//! presentation layer and bounded to the most recent entries
//! (ring-buffer semantics, oldest evicted first).

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Maximum number of retained error entries.
pub const MAX_LOG_ENTRIES: usize = 100;

/// Category of a tracking error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingErrorKind {
    /// A flight descriptor failed validation at load.
    Configuration,
    /// A telemetry call failed or timed out.
    Api,
    /// Connectivity lost, detected independently of a specific call.
    Network,
    /// Neither airframe-id nor callsign lookup produced a record.
    FlightNotFound,
    /// A fetched record failed post-fetch validation.
    InvalidFlightData,
}

impl std::fmt::Display for TrackingErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "CONFIGURATION_ERROR"),
            Self::Api => write!(f, "API_ERROR"),
            Self::Network => write!(f, "NETWORK_ERROR"),
            Self::FlightNotFound => write!(f, "FLIGHT_NOT_FOUND"),
            Self::InvalidFlightData => write!(f, "INVALID_FLIGHT_DATA"),
        }
    }
}

/// One recorded tracking error.
#[derive(Debug, Clone)]
pub struct TrackingError {
    /// Error category.
    pub kind: TrackingErrorKind,

    /// Human-readable detail.
    pub message: String,

    /// Flight this error belongs to, if any.
    pub flight_id: Option<String>,

    /// When the error was recorded.
    pub timestamp: DateTime<Utc>,
}

impl TrackingError {
    /// Create an error tied to a specific flight.
    pub fn for_flight(kind: TrackingErrorKind, flight_id: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            flight_id: Some(flight_id.to_string()),
            timestamp: Utc::now(),
        }
    }

    /// Create an error not tied to a flight.
    pub fn global(kind: TrackingErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            flight_id: None,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only error log bounded to [`MAX_LOG_ENTRIES`].
#[derive(Debug)]
pub struct ErrorLog {
    /// Retained entries, oldest first.
    entries: VecDeque<TrackingError>,
    /// Maximum retained entries.
    capacity: usize,
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::new(MAX_LOG_ENTRIES)
    }
}

impl ErrorLog {
    /// Create a log retaining at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when full.
    pub fn push(&mut self, error: TrackingError) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(error);
    }

    /// All retained entries, oldest first.
    pub fn entries(&self) -> Vec<TrackingError> {
        self.entries.iter().cloned().collect()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
