//! Tracking reconciler - per-flight orchestration of live and estimated
//! position.
//!
//! # Components
//!
//! - [`record`] - [`TrackingRecord`] (the central per-flight mutable entity)
//!   and [`TrackingPhase`] (the inactive/initializing/tracking state machine)
//! - [`log`] - [`TrackingError`] and the bounded [`ErrorLog`]
//! - [`reconciler`] - [`FlightTracker`], which owns every record, schedules
//!   per-flight updates at priority-tier cadence, and reconciles live
//!   telemetry with the schedule estimate
//!
//! # Usage
//!
//! ```ignore
//! use flighttrack::telemetry::{OpenSkyClient, TelemetryAdapter, TelemetryConfig};
//! use flighttrack::tracker::FlightTracker;
//! use flighttrack::config::TrackerConfig;
//!
//! let telemetry_config = TelemetryConfig::default();
//! let client = OpenSkyClient::new(telemetry_config.clone())?;
//! let adapter = TelemetryAdapter::new(client, &telemetry_config);
//!
//! let tracker = FlightTracker::new(descriptors, adapter, TrackerConfig::default());
//! tracker.start_all();
//!
//! // Presentation reads snapshots
//! for record in tracker.snapshots() {
//!     println!("{}: {:.1}%", record.flight_id, record.progress_percent);
//! }
//! ```

mod log;
mod reconciler;
mod record;

pub use log::{ErrorLog, TrackingError, TrackingErrorKind, MAX_LOG_ENTRIES};
pub use reconciler::FlightTracker;
pub use record::{TrackingPhase, TrackingRecord};
