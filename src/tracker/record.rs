//! Per-flight tracking state: the central mutable record and its phase.

use chrono::{DateTime, Utc};

use crate::config::{FlightConfig, ScheduleWindow};
use crate::estimator;
use crate::geo::{Coordinate, Route};
use crate::telemetry::LiveTelemetryRecord;

/// Tracking state machine phase for one flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingPhase {
    /// Not in the active tracking set.
    #[default]
    Inactive,
    /// Enabled and scheduled; first position not yet resolved.
    Initializing,
    /// Update cadence running, position resolved.
    Tracking,
}

impl std::fmt::Display for TrackingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inactive => write!(f, "Inactive"),
            Self::Initializing => write!(f, "Initializing"),
            Self::Tracking => write!(f, "Tracking"),
        }
    }
}

/// The per-flight tracking record.
///
/// Owned and mutated exclusively by the reconciler; consumers receive
/// clones (snapshots) and must tolerate records updated at different times.
///
/// While `is_live` is false, `progress_percent` is schedule-derived and
/// monotonically non-decreasing in time. Once live telemetry is adopted,
/// progress tracks measured remaining distance and may move
/// non-monotonically when telemetry is noisy; that is expected.
#[derive(Debug, Clone)]
pub struct TrackingRecord {
    /// Flight identifier from configuration.
    pub flight_id: String,

    /// Great-circle route between the configured endpoints.
    pub route: Route,

    /// Schedule window in UTC.
    pub schedule: ScheduleWindow,

    /// Most recently resolved position (live or estimated).
    pub current_position: Coordinate,

    /// Route progress in percent, clamped to `[0, 100]`.
    pub progress_percent: f64,

    /// Whether the current position came from live telemetry.
    pub is_live: bool,

    /// When this record was last written.
    pub last_updated_at: DateTime<Utc>,

    /// Minutes until scheduled arrival, clamped to >= 0.
    pub remaining_minutes: f64,

    /// The live record behind the current position, if any.
    pub live_telemetry: Option<LiveTelemetryRecord>,
}

impl TrackingRecord {
    /// Initial record for a flight entering the active set.
    ///
    /// Seeded from the schedule estimate so a snapshot is never empty, even
    /// before the first update tick resolves.
    pub fn initial(config: &FlightConfig, now: DateTime<Utc>) -> Self {
        let est = estimator::estimate(config.route, config.schedule, now);
        Self {
            flight_id: config.id.clone(),
            route: config.route,
            schedule: config.schedule,
            current_position: est.position,
            progress_percent: est.progress_percent,
            is_live: false,
            last_updated_at: now,
            remaining_minutes: est.remaining_minutes,
            live_telemetry: None,
        }
    }
}
