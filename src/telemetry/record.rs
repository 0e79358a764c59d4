//! Telemetry record types: raw wire state vectors and the canonical record.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::geo::Coordinate;

use super::error::TelemetryError;

/// A decoded aircraft state vector from the telemetry feed.
///
/// The wire format is a positional array of mixed types in which any field
/// may be null; this struct preserves that optionality. Validation and
/// normalization into [`LiveTelemetryRecord`] happen in the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    /// ICAO 24-bit transponder address (hex, lowercase).
    pub icao24: String,

    /// Broadcast callsign, right-padded with spaces on the wire.
    pub callsign: Option<String>,

    /// Country of registration.
    pub origin_country: String,

    /// Unix timestamp of the last position report.
    pub time_position: Option<i64>,

    /// Unix timestamp of the last message of any kind.
    pub last_contact: i64,

    /// Longitude in degrees.
    pub longitude: Option<f64>,

    /// Latitude in degrees.
    pub latitude: Option<f64>,

    /// Barometric altitude in meters.
    pub baro_altitude: Option<f64>,

    /// Whether the aircraft reports itself on the ground.
    pub on_ground: bool,

    /// Ground speed in meters per second.
    pub velocity: Option<f64>,

    /// True track in degrees clockwise from north.
    pub true_track: Option<f64>,

    /// Vertical rate in meters per second (negative = descending).
    pub vertical_rate: Option<f64>,

    /// Geometric altitude in meters.
    pub geo_altitude: Option<f64>,
}

impl StateVector {
    /// Decode one positional state-vector array.
    ///
    /// The feed emits 17-element arrays (18 with category); anything shorter
    /// than the 14 fields we index is malformed.
    pub fn from_wire(value: &Value) -> Result<Self, TelemetryError> {
        let fields = value.as_array().ok_or_else(|| {
            TelemetryError::MalformedStateVector("state vector is not an array".to_string())
        })?;
        if fields.len() < 14 {
            return Err(TelemetryError::MalformedStateVector(format!(
                "state vector has {} fields, expected at least 14",
                fields.len()
            )));
        }

        let icao24 = fields[0]
            .as_str()
            .ok_or_else(|| {
                TelemetryError::MalformedStateVector("icao24 is not a string".to_string())
            })?
            .to_string();
        let origin_country = fields[2]
            .as_str()
            .ok_or_else(|| {
                TelemetryError::MalformedStateVector("origin_country is not a string".to_string())
            })?
            .to_string();
        let last_contact = fields[4].as_i64().ok_or_else(|| {
            TelemetryError::MalformedStateVector("last_contact is not an integer".to_string())
        })?;

        Ok(Self {
            icao24,
            callsign: fields[1].as_str().map(str::to_string),
            origin_country,
            time_position: fields[3].as_i64(),
            last_contact,
            longitude: fields[5].as_f64(),
            latitude: fields[6].as_f64(),
            baro_altitude: fields[7].as_f64(),
            on_ground: fields[8].as_bool().unwrap_or(false),
            velocity: fields[9].as_f64(),
            true_track: fields[10].as_f64(),
            vertical_rate: fields[11].as_f64(),
            geo_altitude: fields[13].as_f64(),
        })
    }
}

/// Canonical, validated live telemetry record for one aircraft.
///
/// Produced only by the telemetry adapter; never hand-constructed elsewhere.
/// A record only exists for airborne aircraft with a complete position and a
/// non-blank callsign.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveTelemetryRecord {
    /// Reported position.
    pub position: Coordinate,

    /// Altitude in meters (geometric preferred, barometric fallback).
    pub altitude_meters: f64,

    /// Ground speed in meters per second.
    pub ground_speed_mps: f64,

    /// Heading (true track) in degrees `[0, 360)`.
    pub heading_degrees: f64,

    /// On-ground flag as reported. Always false for records that pass the
    /// adapter's validity filter.
    pub on_ground: bool,

    /// When the feed measured this position.
    pub source_timestamp: DateTime<Utc>,

    /// ICAO 24-bit transponder address.
    pub airframe_id: String,

    /// Trimmed broadcast callsign.
    pub callsign: String,

    /// Country of registration.
    pub origin_country: String,
}
