//! Flight tracker - the live/estimated reconciliation core.
//!
//! One [`FlightTracker`] instance owns the mapping from flight identifier to
//! [`TrackingRecord`] for every flight in the active tracking set. On each
//! update (cadence tick or manual refresh) it attempts a live telemetry
//! lookup and falls back to the schedule estimate, so every tracked flight
//! always has a position.
//!
//! # Update algorithm
//!
//! 1. Look up telemetry by airframe id; if absent, by callsign.
//! 2. Valid record: adopt its position, mark the flight live, and recompute
//!    progress from the remaining great-circle distance to the destination.
//! 3. Otherwise: adopt the schedule estimate, mark the flight not live, and
//!    append a `FLIGHT_NOT_FOUND` (or `API_ERROR` on timeout) log entry.
//!
//! # Scheduling
//!
//! Each tracked flight runs its own poll loop (`tokio::time::interval` at
//! the flight's priority-tier cadence) with a `CancellationToken` cancelled
//! on stop. A per-flight update gate (`tokio::sync::Mutex`) guarantees at
//! most one in-flight update per record: a tick that finds the gate held
//! skips, a manual refresh waits. Results from a lookup that was already
//! in flight when tracking stopped are discarded, never applied.
//!
//! # Failure isolation
//!
//! Per-flight failures never block other flights; total telemetry
//! unavailability degrades the whole set to estimated mode indefinitely.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::config::{FlightConfig, FlightDescriptor, TrackerConfig};
use crate::estimator;
use crate::geo;
use crate::status::{classify, FlightStatus};
use crate::telemetry::{LiveTelemetryRecord, TelemetryAdapter, TelemetryClient};

use super::log::{ErrorLog, TrackingError, TrackingErrorKind};
use super::record::{TrackingPhase, TrackingRecord};

/// Outcome of the two-key live lookup for one update.
enum LookupOutcome {
    /// A valid airborne record was obtained.
    Live(LiveTelemetryRecord),
    /// Both lookups completed without producing a record.
    Absent,
    /// The lookup did not resolve within the configured bound.
    TimedOut,
}

/// Shared state for one tracked flight.
struct FlightShared {
    /// Immutable flight configuration.
    config: Arc<FlightConfig>,

    /// The tracking record; held only for synchronous mutation so
    /// snapshots stay cheap.
    record: Mutex<TrackingRecord>,

    /// State machine phase.
    phase: Mutex<TrackingPhase>,

    /// Update gate: at most one in-flight update per record.
    gate: tokio::sync::Mutex<()>,

    /// Cancelled when tracking stops.
    cancel: CancellationToken,
}

/// Internal tracker state shared with the per-flight loops.
struct TrackerInner<C: TelemetryClient> {
    /// Telemetry adapter (shared cache across flights).
    adapter: TelemetryAdapter<C>,

    /// Cadence and timeout configuration.
    config: TrackerConfig,

    /// Validated flight configurations by id.
    configs: HashMap<String, Arc<FlightConfig>>,

    /// Active tracking set.
    flights: RwLock<HashMap<String, Arc<FlightShared>>>,

    /// Bounded error log.
    errors: Mutex<ErrorLog>,
}

/// The tracking reconciler.
///
/// Constructed from validated configuration at start and torn down with
/// [`FlightTracker::stop_all`]; owns all per-flight state. Consumers
/// receive read-only [`TrackingRecord`] snapshots.
pub struct FlightTracker<C: TelemetryClient + 'static> {
    inner: Arc<TrackerInner<C>>,
}

impl<C: TelemetryClient + 'static> FlightTracker<C> {
    /// Create a tracker from raw flight descriptors.
    ///
    /// Each descriptor is validated independently; failures are logged as
    /// `CONFIGURATION_ERROR` and skipped without affecting their siblings.
    pub fn new(
        descriptors: Vec<FlightDescriptor>,
        adapter: TelemetryAdapter<C>,
        config: TrackerConfig,
    ) -> Self {
        let mut configs = HashMap::new();
        let mut errors = ErrorLog::default();

        for descriptor in descriptors {
            let id = descriptor.id.clone();
            match crate::config::validate(descriptor) {
                Ok(flight) => {
                    if configs.contains_key(&flight.id) {
                        tracing::warn!(flight_id = %flight.id, "Duplicate flight id in configuration");
                        errors.push(TrackingError::for_flight(
                            TrackingErrorKind::Configuration,
                            &flight.id,
                            "duplicate flight id",
                        ));
                        continue;
                    }
                    configs.insert(flight.id.clone(), Arc::new(flight));
                }
                Err(e) => {
                    tracing::warn!(flight_id = %id, error = %e, "Rejected flight descriptor");
                    errors.push(TrackingError::for_flight(
                        TrackingErrorKind::Configuration,
                        &id,
                        e.to_string(),
                    ));
                }
            }
        }

        tracing::info!(flights = configs.len(), "Flight tracker configured");

        Self {
            inner: Arc::new(TrackerInner {
                adapter,
                config,
                configs,
                flights: RwLock::new(HashMap::new()),
                errors: Mutex::new(errors),
            }),
        }
    }

    /// Flight ids that passed configuration validation.
    pub fn configured_ids(&self) -> Vec<String> {
        self.inner.configs.keys().cloned().collect()
    }

    /// Start tracking every enabled, not-yet-completed flight.
    ///
    /// Returns the number of flights that entered the active set.
    pub fn start_all(&self) -> usize {
        let ids: Vec<String> = self.inner.configs.keys().cloned().collect();
        ids.iter().filter(|id| self.start_tracking(id)).count()
    }

    /// Start tracking one flight.
    ///
    /// No-op (returning true) when the flight is already tracked. Returns
    /// false for unknown, disabled, or already-completed flights.
    pub fn start_tracking(&self, flight_id: &str) -> bool {
        let Some(config) = self.inner.configs.get(flight_id) else {
            tracing::warn!(flight_id, "Cannot start tracking unknown flight");
            return false;
        };
        if !config.enabled {
            tracing::debug!(flight_id, "Flight is disabled, not tracking");
            return false;
        }
        let now = Utc::now();
        if classify(&config.schedule, now) == FlightStatus::Completed {
            tracing::debug!(flight_id, "Flight already completed, not tracking");
            return false;
        }

        let Some(shared) = self.inner.activate(config, now) else {
            return true; // already tracking
        };

        let period = self.inner.config.interval_for(config.priority);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(run_flight_loop(inner, Arc::clone(&shared), period));

        tracing::info!(
            flight_id,
            tier = %config.priority,
            interval_secs = period.as_secs(),
            "Tracking started"
        );
        true
    }

    /// Stop tracking one flight.
    ///
    /// Cancels its pending timer; a lookup already in flight completes but
    /// its result is discarded. Returns false if the flight was not tracked.
    pub fn stop_tracking(&self, flight_id: &str) -> bool {
        let removed = self.inner.flights.write().unwrap().remove(flight_id);
        match removed {
            Some(shared) => {
                *shared.phase.lock().unwrap() = TrackingPhase::Inactive;
                shared.cancel.cancel();
                tracing::info!(flight_id, "Tracking stopped");
                true
            }
            None => false,
        }
    }

    /// Stop tracking all flights.
    pub fn stop_all(&self) {
        let ids: Vec<String> = self.inner.flights.read().unwrap().keys().cloned().collect();
        for id in ids {
            self.stop_tracking(&id);
        }
    }

    /// Run an immediate update for one flight, waiting for any in-flight
    /// update to finish first. Returns false if the flight is not tracked.
    pub async fn refresh_flight(&self, flight_id: &str) -> bool {
        let shared = {
            let flights = self.inner.flights.read().unwrap();
            flights.get(flight_id).cloned()
        };
        let Some(shared) = shared else {
            return false;
        };

        let _gate = shared.gate.lock().await;
        if shared.cancel.is_cancelled() {
            return false;
        }

        let now = Utc::now();
        if classify(&shared.config.schedule, now) == FlightStatus::Completed {
            self.inner.finalize_completed(&shared, now);
        } else {
            self.inner.update_flight(&shared, now).await;
        }
        true
    }

    /// Run an immediate update for every tracked flight.
    ///
    /// Failures stay isolated per flight; one flight's telemetry trouble
    /// never blocks the rest.
    pub async fn refresh_all(&self) {
        let ids: Vec<String> = self.inner.flights.read().unwrap().keys().cloned().collect();
        for id in ids {
            self.refresh_flight(&id).await;
        }
    }

    /// Snapshot of one flight's tracking record, if tracked.
    pub fn snapshot(&self, flight_id: &str) -> Option<TrackingRecord> {
        let flights = self.inner.flights.read().unwrap();
        flights
            .get(flight_id)
            .map(|shared| shared.record.lock().unwrap().clone())
    }

    /// Snapshots of all tracked flights, in no particular order.
    ///
    /// Records may have been updated at different times; each carries its
    /// own `last_updated_at`.
    pub fn snapshots(&self) -> Vec<TrackingRecord> {
        let flights = self.inner.flights.read().unwrap();
        flights
            .values()
            .map(|shared| shared.record.lock().unwrap().clone())
            .collect()
    }

    /// Current state machine phase for a flight.
    pub fn phase(&self, flight_id: &str) -> TrackingPhase {
        let flights = self.inner.flights.read().unwrap();
        flights
            .get(flight_id)
            .map(|shared| *shared.phase.lock().unwrap())
            .unwrap_or(TrackingPhase::Inactive)
    }

    /// Lifecycle status of a configured flight at the current time.
    pub fn status(&self, flight_id: &str) -> Option<FlightStatus> {
        self.inner
            .configs
            .get(flight_id)
            .map(|config| classify(&config.schedule, Utc::now()))
    }

    /// Recent tracking errors, oldest first.
    pub fn errors(&self) -> Vec<TrackingError> {
        self.inner.errors.lock().unwrap().entries()
    }

    /// Clear the error log.
    pub fn clear_errors(&self) {
        self.inner.errors.lock().unwrap().clear();
    }

    /// Record a connectivity loss detected outside a specific telemetry
    /// call (host-side connectivity monitor hook).
    pub fn report_network_outage(&self, message: impl Into<String>) {
        self.inner.push_error(TrackingError::global(
            TrackingErrorKind::Network,
            message,
        ));
    }
}

impl<C: TelemetryClient> TrackerInner<C> {
    /// Register a flight in the active set.
    ///
    /// Returns `None` when the flight is already tracked. The record is
    /// seeded from the schedule estimate so it is never empty.
    fn activate(
        &self,
        config: &Arc<FlightConfig>,
        now: DateTime<Utc>,
    ) -> Option<Arc<FlightShared>> {
        let mut flights = self.flights.write().unwrap();
        if flights.contains_key(&config.id) {
            return None;
        }

        let shared = Arc::new(FlightShared {
            config: Arc::clone(config),
            record: Mutex::new(TrackingRecord::initial(config, now)),
            phase: Mutex::new(TrackingPhase::Initializing),
            gate: tokio::sync::Mutex::new(()),
            cancel: CancellationToken::new(),
        });
        flights.insert(config.id.clone(), Arc::clone(&shared));
        Some(shared)
    }

    /// One reconciliation pass for one flight.
    async fn update_flight(&self, shared: &FlightShared, now: DateTime<Utc>) {
        let config = &shared.config;

        let outcome = self.lookup_live(config).await;
        if shared.cancel.is_cancelled() {
            // Stopped while the lookup was in flight; discard the result
            tracing::debug!(flight_id = %config.id, "Discarding update for stopped flight");
            return;
        }

        match outcome {
            LookupOutcome::Live(record) => self.apply_live(shared, record, now),
            LookupOutcome::Absent => {
                self.push_error(TrackingError::for_flight(
                    TrackingErrorKind::FlightNotFound,
                    &config.id,
                    "no live record by airframe id or callsign",
                ));
                self.apply_estimate(shared, now);
            }
            LookupOutcome::TimedOut => {
                self.push_error(TrackingError::for_flight(
                    TrackingErrorKind::Api,
                    &config.id,
                    format!(
                        "telemetry lookup exceeded {}s",
                        self.config.telemetry_timeout.as_secs()
                    ),
                ));
                self.apply_estimate(shared, now);
            }
        }

        let mut phase = shared.phase.lock().unwrap();
        if *phase == TrackingPhase::Initializing {
            *phase = TrackingPhase::Tracking;
            tracing::info!(flight_id = %config.id, "First position resolved");
        }
    }

    /// Try airframe id, then callsign, bounded by the configured timeout.
    async fn lookup_live(&self, config: &FlightConfig) -> LookupOutcome {
        let fetch = async {
            if let Some(id) = &config.airframe_id {
                if let Some(record) = self.adapter.by_airframe_id(id).await {
                    return Some(record);
                }
            }
            if let Some(callsign) = &config.callsign {
                if let Some(record) = self.adapter.by_callsign(callsign).await {
                    return Some(record);
                }
            }
            None
        };

        match tokio::time::timeout(self.config.telemetry_timeout, fetch).await {
            Ok(Some(record)) => LookupOutcome::Live(record),
            Ok(None) => LookupOutcome::Absent,
            Err(_) => LookupOutcome::TimedOut,
        }
    }

    /// Adopt a live telemetry record.
    ///
    /// Progress comes from the remaining great-circle distance to the
    /// destination, not from the schedule clock, so it may move
    /// non-monotonically with noisy telemetry.
    fn apply_live(&self, shared: &FlightShared, live: LiveTelemetryRecord, now: DateTime<Utc>) {
        let config = &shared.config;

        let lat = live.position.latitude;
        let lon = live.position.longitude;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            self.push_error(TrackingError::for_flight(
                TrackingErrorKind::InvalidFlightData,
                &config.id,
                format!("live position ({lat}, {lon}) out of range"),
            ));
            self.apply_estimate(shared, now);
            return;
        }

        let total = config.total_distance_km;
        let remaining = geo::distance_km(live.position, config.route.destination);
        let progress = if total <= f64::EPSILON {
            100.0
        } else {
            ((total - remaining) / total * 100.0).clamp(0.0, 100.0)
        };
        let remaining_minutes =
            ((config.schedule.arrival - now).num_seconds() as f64 / 60.0).max(0.0);

        let mut record = shared.record.lock().unwrap();
        record.current_position = live.position;
        record.progress_percent = progress;
        record.is_live = true;
        record.last_updated_at = now;
        record.remaining_minutes = remaining_minutes;
        record.live_telemetry = Some(live);

        tracing::debug!(
            flight_id = %config.id,
            progress = format!("{progress:.1}"),
            remaining_km = format!("{remaining:.0}"),
            "Live position adopted"
        );
    }

    /// Adopt the schedule-based estimate.
    fn apply_estimate(&self, shared: &FlightShared, now: DateTime<Utc>) {
        let config = &shared.config;
        let est = estimator::estimate(config.route, config.schedule, now);

        let mut record = shared.record.lock().unwrap();
        record.current_position = est.position;
        record.progress_percent = est.progress_percent;
        record.is_live = false;
        record.last_updated_at = now;
        record.remaining_minutes = est.remaining_minutes;
        record.live_telemetry = None;

        tracing::trace!(
            flight_id = %config.id,
            progress = format!("{:.1}", est.progress_percent),
            "Estimated position adopted"
        );
    }

    /// Pin a completed flight to its destination and remove it from the
    /// active set.
    fn finalize_completed(&self, shared: &FlightShared, now: DateTime<Utc>) {
        {
            let mut record = shared.record.lock().unwrap();
            record.current_position = shared.config.route.destination;
            record.progress_percent = 100.0;
            record.is_live = false;
            record.last_updated_at = now;
            record.remaining_minutes = 0.0;
            record.live_telemetry = None;
        }
        *shared.phase.lock().unwrap() = TrackingPhase::Inactive;
        shared.cancel.cancel();
        self.flights.write().unwrap().remove(&shared.config.id);

        tracing::info!(flight_id = %shared.config.id, "Flight completed, tracking stopped");
    }

    /// Append to the bounded error log.
    fn push_error(&self, error: TrackingError) {
        self.errors.lock().unwrap().push(error);
    }
}

/// Per-flight poll loop at the priority-tier cadence.
///
/// Exits on cancellation or when the flight completes. A tick that fires
/// while the previous update is still in flight is skipped.
async fn run_flight_loop<C: TelemetryClient + 'static>(
    inner: Arc<TrackerInner<C>>,
    shared: Arc<FlightShared>,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = shared.cancel.cancelled() => break,
            _ = interval.tick() => {
                let now = Utc::now();
                if classify(&shared.config.schedule, now) == FlightStatus::Completed {
                    inner.finalize_completed(&shared, now);
                    break;
                }
                match shared.gate.try_lock() {
                    Ok(_gate) => inner.update_flight(&shared, now).await,
                    Err(_) => {
                        tracing::trace!(
                            flight_id = %shared.config.id,
                            "Previous update still in flight, skipping tick"
                        );
                    }
                }
            }
        }
    }

    tracing::debug!(flight_id = %shared.config.id, "Update loop stopped");
}
