//! Flight lifecycle classification against the schedule window.
//!
//! Maps a flight's scheduled departure/arrival against the current time into
//! a three-state lifecycle. Pure and total; the reconciler uses it to decide
//! when tracking starts and stops, and the presentation layer uses it for
//! status badges.

use chrono::{DateTime, Utc};

use crate::config::ScheduleWindow;

/// Lifecycle state of a flight relative to its schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightStatus {
    /// Departure is in the future.
    Upcoming,
    /// Between departure (inclusive) and arrival (exclusive).
    Current,
    /// Arrival instant reached or passed.
    Completed,
}

impl std::fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upcoming => write!(f, "Upcoming"),
            Self::Current => write!(f, "Current"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// Classify a flight's lifecycle state at `now`.
///
/// Boundary policy: the departure instant itself counts as `Current` and the
/// arrival instant itself counts as `Completed`. This matches the estimator,
/// which pins progress to 100% at the arrival instant.
pub fn classify(schedule: &ScheduleWindow, now: DateTime<Utc>) -> FlightStatus {
    if now < schedule.departure {
        FlightStatus::Upcoming
    } else if now >= schedule.arrival {
        FlightStatus::Completed
    } else {
        FlightStatus::Current
    }
}
