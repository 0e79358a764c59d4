//! Schedule-derived position estimation.
//!
//! When no live telemetry is available for a flight, its position is
//! estimated deterministically from the schedule: the fraction of the
//! scheduled window elapsed at `now` is mapped onto the great circle between
//! the route endpoints. Pure and synchronous; the reconciler calls this on
//! every fallback tick.

use chrono::{DateTime, Utc};

use crate::config::ScheduleWindow;
use crate::geo::{self, Coordinate, Route};

/// Output of a schedule-based position estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionEstimate {
    /// Interpolated position along the great-circle route.
    pub position: Coordinate,

    /// Schedule progress in percent, clamped to `[0, 100]`.
    pub progress_percent: f64,

    /// Minutes since scheduled departure, clamped to >= 0.
    pub elapsed_minutes: f64,

    /// Minutes until scheduled arrival, clamped to >= 0.
    pub remaining_minutes: f64,

    /// Total scheduled duration in minutes (always > 0).
    pub total_minutes: f64,

    /// Initial bearing from the estimated position toward the destination,
    /// in degrees `[0, 360)`. Used by presentation for icon rotation.
    pub bearing_degrees: f64,
}

/// Estimate a flight's position from its schedule at `now`.
///
/// Before departure the estimate pins to the origin at 0%; at or after the
/// arrival instant it pins to the destination at 100%. In between, the
/// elapsed fraction of the schedule window is interpolated spherically along
/// the route.
pub fn estimate(route: Route, schedule: ScheduleWindow, now: DateTime<Utc>) -> PositionEstimate {
    let total_seconds = schedule.total_seconds() as f64;
    let elapsed_seconds = (now - schedule.departure).num_seconds() as f64;

    let fraction = (elapsed_seconds / total_seconds).clamp(0.0, 1.0);

    let position = if fraction <= 0.0 {
        route.origin
    } else if fraction >= 1.0 {
        route.destination
    } else {
        geo::interpolate(route.origin, route.destination, fraction)
    };

    let elapsed_minutes = (elapsed_seconds / 60.0).max(0.0).min(total_seconds / 60.0);
    let total_minutes = total_seconds / 60.0;
    let remaining_minutes = (total_minutes - elapsed_minutes).max(0.0);

    PositionEstimate {
        position,
        progress_percent: fraction * 100.0,
        elapsed_minutes,
        remaining_minutes,
        total_minutes,
        bearing_degrees: geo::initial_bearing(position, route.destination),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Chicago O'Hare.
    const ORD: Coordinate = Coordinate {
        latitude: 41.9742,
        longitude: -87.9073,
    };

    /// Tokyo Narita.
    const NRT: Coordinate = Coordinate {
        latitude: 35.7647,
        longitude: 140.3864,
    };

    /// ORD-NRT, departure 2025-06-25T12:30:00-05:00 (17:30Z), arrival
    /// 2025-06-26T15:15:00+09:00 (06:15Z next day): 765 scheduled minutes.
    fn ord_nrt() -> (Route, ScheduleWindow) {
        let route = Route {
            origin: ORD,
            destination: NRT,
        };
        let schedule = ScheduleWindow::new(
            Utc.with_ymd_and_hms(2025, 6, 25, 17, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 26, 6, 15, 0).unwrap(),
        )
        .unwrap();
        (route, schedule)
    }

    #[test]
    fn test_at_departure_pins_to_origin() {
        let (route, schedule) = ord_nrt();
        let est = estimate(route, schedule, schedule.departure);

        assert_eq!(est.progress_percent, 0.0);
        assert_eq!(est.position, ORD);
        assert_eq!(est.elapsed_minutes, 0.0);
        assert_eq!(est.remaining_minutes, 765.0);
        assert_eq!(est.total_minutes, 765.0);
    }

    #[test]
    fn test_before_departure_pins_to_origin() {
        let (route, schedule) = ord_nrt();
        let now = schedule.departure - chrono::Duration::hours(3);
        let est = estimate(route, schedule, now);

        assert_eq!(est.progress_percent, 0.0);
        assert_eq!(est.position, ORD);
        assert_eq!(est.elapsed_minutes, 0.0);
    }

    #[test]
    fn test_at_arrival_pins_to_destination() {
        let (route, schedule) = ord_nrt();
        let est = estimate(route, schedule, schedule.arrival);

        assert_eq!(est.progress_percent, 100.0);
        assert_eq!(est.position, NRT);
        assert_eq!(est.remaining_minutes, 0.0);
    }

    #[test]
    fn test_after_arrival_pins_to_destination() {
        let (route, schedule) = ord_nrt();
        let now = schedule.arrival + chrono::Duration::hours(5);
        let est = estimate(route, schedule, now);

        assert_eq!(est.progress_percent, 100.0);
        assert_eq!(est.position, NRT);
        assert_eq!(est.remaining_minutes, 0.0);
        assert_eq!(est.elapsed_minutes, 765.0);
    }

    #[test]
    fn test_halfway_is_fifty_percent_on_great_circle() {
        let (route, schedule) = ord_nrt();
        let now = schedule.departure + chrono::Duration::seconds(765 * 60 / 2);
        let est = estimate(route, schedule, now);

        assert!((est.progress_percent - 50.0).abs() < 0.1);

        // Strictly between the endpoints along the great circle
        let to_here = geo::distance_km(ORD, est.position);
        let total = geo::distance_km(ORD, NRT);
        assert!(to_here > 0.0 && to_here < total);
        assert!((to_here - total / 2.0).abs() < 5.0);

        // Not the linear lat/lon midpoint: this route arcs far north
        let linear_lat = (ORD.latitude + NRT.latitude) / 2.0;
        assert!(est.position.latitude > linear_lat + 10.0);

        assert!((est.elapsed_minutes - 382.5).abs() < 0.1);
        assert!((est.remaining_minutes - 382.5).abs() < 0.1);
    }

    #[test]
    fn test_progress_monotonic_in_time() {
        let (route, schedule) = ord_nrt();
        let mut previous = -1.0;
        for minutes in (0..=765).step_by(45) {
            let now = schedule.departure + chrono::Duration::minutes(minutes);
            let est = estimate(route, schedule, now);
            assert!(est.progress_percent >= previous);
            previous = est.progress_percent;
        }
    }

    #[test]
    fn test_bearing_in_range() {
        let (route, schedule) = ord_nrt();
        let now = schedule.departure + chrono::Duration::hours(4);
        let est = estimate(route, schedule, now);
        assert!((0.0..360.0).contains(&est.bearing_degrees));
    }
}
