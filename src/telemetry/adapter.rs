//! Telemetry adapter - lookup, validation filter, and TTL caching.
//!
//! The adapter sits between the reconciler and the raw feed client. It
//! resolves one aircraft at a time by airframe id (preferred, unique) or
//! callsign (fallback), drops records that fail basic validity, and caches
//! results so a flight polled at a fast cadence does not hammer the feed.
//!
//! # Caching
//!
//! Results are keyed by normalized lookup key with a fixed validity window
//! (10 seconds by default). A fresh hit returns without a network call. When
//! a refetch fails, the last known good record is returned instead of
//! nothing; callers still see normal staleness on the tracking side because
//! the record carries its source timestamp.

use chrono::{DateTime, Utc};

use crate::cache::TtlCache;
use crate::geo::Coordinate;

use super::client::TelemetryClient;
use super::config::TelemetryConfig;
use super::record::{LiveTelemetryRecord, StateVector};

/// Telemetry adapter over a feed client.
///
/// The cache is shared across all flights; concurrent lookups for the same
/// key within the validity window resolve from cache.
pub struct TelemetryAdapter<C: TelemetryClient> {
    /// Feed client.
    client: C,

    /// Cache of validated records keyed by normalized lookup key.
    cache: TtlCache<String, LiveTelemetryRecord>,
}

impl<C: TelemetryClient> TelemetryAdapter<C> {
    /// Create an adapter with the configured cache validity window.
    pub fn new(client: C, config: &TelemetryConfig) -> Self {
        Self {
            client,
            cache: TtlCache::new(config.cache_validity),
        }
    }

    /// Look up a live record by ICAO 24-bit airframe address.
    ///
    /// `None` means no airborne report currently exists for that address, or
    /// the upstream query failed with no last-known-good record available.
    pub async fn by_airframe_id(&self, airframe_id: &str) -> Option<LiveTelemetryRecord> {
        let id = airframe_id.trim().to_ascii_lowercase();
        if id.is_empty() {
            return None;
        }
        let key = format!("icao24:{id}");

        if let Some(record) = self.cache.get(&key) {
            tracing::trace!(airframe_id = %id, "Telemetry cache hit");
            return Some(record);
        }

        match self.client.states_by_airframe(&id).await {
            Ok(states) => self.select_and_cache(&key, states, |sv| {
                sv.icao24.eq_ignore_ascii_case(&id)
            }),
            Err(e) => {
                tracing::warn!(airframe_id = %id, error = %e, "Airframe telemetry lookup failed");
                self.last_known_good(&key)
            }
        }
    }

    /// Look up a live record by callsign.
    ///
    /// Matching is exact after trimming, case-insensitive. Callsigns are not
    /// guaranteed unique; the first valid match wins.
    pub async fn by_callsign(&self, callsign: &str) -> Option<LiveTelemetryRecord> {
        let wanted = callsign.trim().to_ascii_uppercase();
        if wanted.is_empty() {
            return None;
        }
        let key = format!("callsign:{wanted}");

        if let Some(record) = self.cache.get(&key) {
            tracing::trace!(callsign = %wanted, "Telemetry cache hit");
            return Some(record);
        }

        match self.client.all_states().await {
            Ok(states) => self.select_and_cache(&key, states, |sv| {
                sv.callsign
                    .as_deref()
                    .is_some_and(|cs| cs.trim().eq_ignore_ascii_case(&wanted))
            }),
            Err(e) => {
                tracing::warn!(callsign = %wanted, error = %e, "Callsign telemetry lookup failed");
                self.last_known_good(&key)
            }
        }
    }

    /// Pick the first matching valid record, cache it under `key`.
    fn select_and_cache(
        &self,
        key: &str,
        states: Vec<StateVector>,
        matches: impl Fn(&StateVector) -> bool,
    ) -> Option<LiveTelemetryRecord> {
        let record = states
            .into_iter()
            .filter(&matches)
            .find_map(|sv| validate_record(&sv));

        match record {
            Some(record) => {
                self.cache.insert(key.to_string(), record.clone());
                Some(record)
            }
            None => {
                tracing::trace!(key, "No valid airborne record in feed response");
                None
            }
        }
    }

    /// Expired cache entry reused when a refetch fails.
    fn last_known_good(&self, key: &str) -> Option<LiveTelemetryRecord> {
        let record = self.cache.get_stale(&key.to_string());
        if record.is_some() {
            tracing::debug!(key, "Reusing last known good telemetry record after fetch failure");
        }
        record
    }
}

/// Validate and normalize a raw state vector into a canonical record.
///
/// Returns `None` for records missing a position, with a blank callsign, or
/// marked on-ground; aircraft on the ground are not tracked in transit.
fn validate_record(sv: &StateVector) -> Option<LiveTelemetryRecord> {
    let latitude = sv.latitude?;
    let longitude = sv.longitude?;
    let callsign = sv.callsign.as_deref().map(str::trim).unwrap_or("");
    if callsign.is_empty() || sv.on_ground {
        return None;
    }

    let epoch = sv.time_position.unwrap_or(sv.last_contact);
    let source_timestamp: DateTime<Utc> =
        DateTime::from_timestamp(epoch, 0).unwrap_or_else(Utc::now);

    Some(LiveTelemetryRecord {
        position: Coordinate::new(latitude, longitude),
        altitude_meters: sv.geo_altitude.or(sv.baro_altitude).unwrap_or(0.0),
        ground_speed_mps: sv.velocity.unwrap_or(0.0),
        heading_degrees: sv.true_track.unwrap_or(0.0).rem_euclid(360.0),
        on_ground: sv.on_ground,
        source_timestamp,
        airframe_id: sv.icao24.clone(),
        callsign: callsign.to_string(),
        origin_country: sv.origin_country.clone(),
    })
}
