//! Flight configuration: descriptors, validation, and priority tiers.
//!
//! The tracker consumes a static list of [`FlightDescriptor`]s at startup
//! (read-only input, typically deserialized from JSON by the host
//! application). Each descriptor is validated into a [`FlightConfig`] before
//! it can enter the tracking set; a descriptor that fails validation is
//! rejected individually and never blocks its siblings.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::geo::{self, Coordinate, Route};

/// Default update interval for [`PriorityTier::Fast`].
pub const DEFAULT_FAST_INTERVAL: Duration = Duration::from_secs(10);

/// Default update interval for [`PriorityTier::Medium`].
pub const DEFAULT_MEDIUM_INTERVAL: Duration = Duration::from_secs(30);

/// Default update interval for [`PriorityTier::Slow`].
pub const DEFAULT_SLOW_INTERVAL: Duration = Duration::from_secs(120);

/// Default bound on a full telemetry lookup (both keys) per update.
pub const DEFAULT_TELEMETRY_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors produced while validating a flight descriptor.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Arrival is not strictly after departure.
    #[error("flight {flight_id}: arrival {arrival} is not after departure {departure}")]
    InvalidSchedule {
        flight_id: String,
        departure: DateTime<Utc>,
        arrival: DateTime<Utc>,
    },

    /// A latitude/longitude is outside its valid range.
    #[error("flight {flight_id}: {field} coordinate ({latitude}, {longitude}) out of range")]
    InvalidCoordinate {
        flight_id: String,
        field: &'static str,
        latitude: f64,
        longitude: f64,
    },

    /// The descriptor has no usable identifier.
    #[error("flight descriptor has a blank id")]
    BlankId,
}

/// Update-frequency class assigned per flight.
///
/// Higher-priority flights refresh faster. The concrete intervals come from
/// [`TrackerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    /// Refresh every few seconds.
    Fast,
    /// Default tier.
    #[default]
    Medium,
    /// Background refresh, order of minutes.
    Slow,
}

impl std::fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fast => write!(f, "fast"),
            Self::Medium => write!(f, "medium"),
            Self::Slow => write!(f, "slow"),
        }
    }
}

/// Tunables for the tracker: per-tier update cadences.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Update interval for fast-tier flights.
    pub fast_interval: Duration,

    /// Update interval for medium-tier flights.
    pub medium_interval: Duration,

    /// Update interval for slow-tier flights.
    pub slow_interval: Duration,

    /// A telemetry lookup that does not resolve within this bound is
    /// treated as a failure and the update falls back to estimation.
    pub telemetry_timeout: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            fast_interval: DEFAULT_FAST_INTERVAL,
            medium_interval: DEFAULT_MEDIUM_INTERVAL,
            slow_interval: DEFAULT_SLOW_INTERVAL,
            telemetry_timeout: DEFAULT_TELEMETRY_TIMEOUT,
        }
    }
}

impl TrackerConfig {
    /// The update interval for a priority tier.
    pub fn interval_for(&self, tier: PriorityTier) -> Duration {
        match tier {
            PriorityTier::Fast => self.fast_interval,
            PriorityTier::Medium => self.medium_interval,
            PriorityTier::Slow => self.slow_interval,
        }
    }
}

/// One endpoint of a route as configured by the host.
#[derive(Debug, Clone, Deserialize)]
pub struct AirportDescriptor {
    /// IATA/ICAO code, e.g. "ORD".
    pub code: String,

    /// Display city name.
    pub city: String,

    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,
}

/// Raw flight descriptor as provided by the configuration boundary.
///
/// Timestamps carry their timezone offset (RFC 3339) and are normalized to
/// UTC during validation.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightDescriptor {
    /// Unique flight identifier within the configuration.
    pub id: String,

    /// Commercial flight number, e.g. "UA 881".
    #[serde(default)]
    pub flight_number: Option<String>,

    /// Operational callsign broadcast by the aircraft, e.g. "UAL881".
    #[serde(default)]
    pub callsign: Option<String>,

    /// Transponder address (ICAO 24-bit hex), the preferred lookup key.
    #[serde(default)]
    pub airframe_id: Option<String>,

    /// Origin airport.
    pub origin: AirportDescriptor,

    /// Destination airport.
    pub destination: AirportDescriptor,

    /// Scheduled departure (with offset).
    pub departure: DateTime<chrono::FixedOffset>,

    /// Scheduled arrival (with offset).
    pub arrival: DateTime<chrono::FixedOffset>,

    /// Aircraft type label, e.g. "B787-9".
    #[serde(default)]
    pub aircraft_type: Option<String>,

    /// Airline label.
    #[serde(default)]
    pub airline: Option<String>,

    /// Update-frequency tier.
    #[serde(default)]
    pub priority: PriorityTier,

    /// Whether this flight participates in tracking.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Scheduled departure/arrival window in UTC.
///
/// Invariant: `arrival` is strictly after `departure`. Enforced by
/// [`ScheduleWindow::new`]; a window that exists is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    /// Scheduled departure instant.
    pub departure: DateTime<Utc>,

    /// Scheduled arrival instant, strictly after departure.
    pub arrival: DateTime<Utc>,
}

impl ScheduleWindow {
    /// Create a schedule window, rejecting `arrival <= departure`.
    pub fn new(departure: DateTime<Utc>, arrival: DateTime<Utc>) -> Option<Self> {
        if arrival > departure {
            Some(Self { departure, arrival })
        } else {
            None
        }
    }

    /// Total scheduled duration in whole seconds.
    pub fn total_seconds(&self) -> i64 {
        (self.arrival - self.departure).num_seconds()
    }

    /// Total scheduled duration in minutes.
    pub fn total_minutes(&self) -> f64 {
        self.total_seconds() as f64 / 60.0
    }
}

/// A validated flight configuration, ready for tracking.
///
/// Produced only by [`validate`]; the route and its total great-circle
/// distance are derived once here and immutable afterwards.
#[derive(Debug, Clone)]
pub struct FlightConfig {
    /// Unique flight identifier.
    pub id: String,

    /// Commercial flight number.
    pub flight_number: Option<String>,

    /// Operational callsign for telemetry lookup.
    pub callsign: Option<String>,

    /// Transponder address for telemetry lookup.
    pub airframe_id: Option<String>,

    /// Origin airport (code/city labels for presentation).
    pub origin: AirportDescriptor,

    /// Destination airport.
    pub destination: AirportDescriptor,

    /// Great-circle route between the endpoints.
    pub route: Route,

    /// Total route distance in kilometers, derived at validation.
    pub total_distance_km: f64,

    /// Schedule window in UTC.
    pub schedule: ScheduleWindow,

    /// Aircraft type label.
    pub aircraft_type: Option<String>,

    /// Airline label.
    pub airline: Option<String>,

    /// Update-frequency tier.
    pub priority: PriorityTier,

    /// Whether this flight participates in tracking.
    pub enabled: bool,
}

fn coordinate_in_range(c: Coordinate) -> bool {
    (-90.0..=90.0).contains(&c.latitude) && (-180.0..=180.0).contains(&c.longitude)
}

/// Validate a raw descriptor into a [`FlightConfig`].
///
/// Checks the schedule invariant (arrival strictly after departure) and
/// coordinate ranges, normalizes timestamps to UTC, and derives the route.
pub fn validate(descriptor: FlightDescriptor) -> Result<FlightConfig, ConfigError> {
    if descriptor.id.trim().is_empty() {
        return Err(ConfigError::BlankId);
    }

    let origin = Coordinate::new(descriptor.origin.latitude, descriptor.origin.longitude);
    let destination = Coordinate::new(
        descriptor.destination.latitude,
        descriptor.destination.longitude,
    );

    if !coordinate_in_range(origin) {
        return Err(ConfigError::InvalidCoordinate {
            flight_id: descriptor.id,
            field: "origin",
            latitude: origin.latitude,
            longitude: origin.longitude,
        });
    }
    if !coordinate_in_range(destination) {
        return Err(ConfigError::InvalidCoordinate {
            flight_id: descriptor.id,
            field: "destination",
            latitude: destination.latitude,
            longitude: destination.longitude,
        });
    }

    let departure = descriptor.departure.with_timezone(&Utc);
    let arrival = descriptor.arrival.with_timezone(&Utc);
    let schedule =
        ScheduleWindow::new(departure, arrival).ok_or(ConfigError::InvalidSchedule {
            flight_id: descriptor.id.clone(),
            departure,
            arrival,
        })?;

    let route = Route {
        origin,
        destination,
    };
    let total_distance_km = geo::distance_km(origin, destination);

    Ok(FlightConfig {
        id: descriptor.id,
        flight_number: descriptor.flight_number,
        callsign: descriptor.callsign,
        airframe_id: descriptor.airframe_id,
        origin: descriptor.origin,
        destination: descriptor.destination,
        route,
        total_distance_km,
        schedule,
        aircraft_type: descriptor.aircraft_type,
        airline: descriptor.airline,
        priority: descriptor.priority,
        enabled: descriptor.enabled,
    })
}
