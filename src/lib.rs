//! FlightTrack - real-time flight position tracking.
//!
//! This library estimates and tracks the geographic position of commercial
//! aircraft along scheduled routes, blending live telemetry (when available)
//! with a deterministic schedule-derived fallback estimate.
//!
//! # High-Level API
//!
//! The [`tracker`] module provides the orchestration core:
//!
//! ```ignore
//! use flighttrack::config::TrackerConfig;
//! use flighttrack::telemetry::{OpenSkyClient, TelemetryAdapter, TelemetryConfig};
//! use flighttrack::tracker::FlightTracker;
//!
//! let telemetry_config = TelemetryConfig::default();
//! let client = OpenSkyClient::new(telemetry_config.clone())?;
//! let adapter = TelemetryAdapter::new(client, &telemetry_config);
//!
//! let tracker = FlightTracker::new(descriptors, adapter, TrackerConfig::default());
//! tracker.start_all();
//! ```
//!
//! The remaining modules are usable standalone: [`geo`] for great-circle
//! math, [`estimator`] for schedule-based position estimates, [`status`] for
//! lifecycle classification, and [`cache`] for TTL caching.

pub mod cache;
pub mod config;
pub mod estimator;
pub mod geo;
pub mod logging;
pub mod status;
pub mod telemetry;
pub mod tracker;

/// Version of the FlightTrack library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
