//! Live telemetry lookup for tracked aircraft.
//!
//! This module fetches current position/velocity for individual aircraft
//! from an external telemetry feed and normalizes the heterogeneous wire
//! format into canonical [`LiveTelemetryRecord`]s.
//!
//! # Architecture
//!
//! - [`TelemetryClient`] - trait over the upstream feed (one HTTP query per
//!   call), so the adapter works against any source and tests use mocks
//! - [`OpenSkyClient`] - implementation for the OpenSky Network REST API
//!   via `reqwest`
//! - [`TelemetryAdapter`] - lookup by airframe id or callsign, validity
//!   filtering, and a shared TTL cache bounding upstream call volume
//!
//! # Failure policy
//!
//! The adapter never propagates upstream failures: a network error, a
//! non-success status, or a malformed payload is logged and surfaced to
//! callers as "absent" (optionally the last known good record, see
//! [`TelemetryAdapter::by_airframe_id`]). Callers treat absent and error
//! identically and fall back to schedule estimation.

mod adapter;
mod client;
mod config;
mod error;
mod record;

pub use adapter::TelemetryAdapter;
pub use client::{OpenSkyClient, TelemetryClient};
pub use config::{BoundingBox, TelemetryConfig, DEFAULT_API_URL, DEFAULT_CACHE_VALIDITY_SECS};
pub use error::TelemetryError;
pub use record::{LiveTelemetryRecord, StateVector};
