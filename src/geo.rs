//! Great-circle geodesy on a spherical Earth model.
//!
//! All position math in the tracker goes through this module: haversine
//! distance, initial bearing, and spherical interpolation along the great
//! circle between two coordinates. Everything here is pure and synchronous.
//!
//! # Degenerate inputs
//!
//! Spherical interpolation divides by `sin(angular distance)`. When the two
//! endpoints are identical (angular distance ~ 0) we return the start point
//! rather than dividing by near-zero. Antipodal endpoints have no unique
//! great circle; bearing and interpolation are undefined there and callers
//! get the same near-zero-denominator guard (the route midpoint degenerates
//! toward the start point). Commercial routes never come close to either
//! case in practice.

/// Mean Earth radius in kilometers (spherical model).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Conversion factor: kilometers to nautical miles.
pub const KM_TO_NM: f64 = 0.539957;

/// Angular distances below this are treated as coincident points.
const MIN_ANGULAR_DISTANCE: f64 = 1e-12;

/// A geographic coordinate in degrees.
///
/// Latitude is in `[-90, 90]`, longitude in `[-180, 180]`. Range checking
/// happens at configuration load (`config::validate`); within the tracker a
/// `Coordinate` is assumed valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,

    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude/longitude degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// A great-circle route between two endpoints.
///
/// Derived once per flight configuration and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    /// Route origin.
    pub origin: Coordinate,

    /// Route destination.
    pub destination: Coordinate,
}

impl Route {
    /// Total great-circle length of the route in kilometers.
    pub fn length_km(&self) -> f64 {
        distance_km(self.origin, self.destination)
    }
}

/// Great-circle distance between two coordinates in kilometers.
///
/// Haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
/// Symmetric: `distance_km(a, b) == distance_km(b, a)`.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Great-circle distance in nautical miles.
pub fn distance_nm(a: Coordinate, b: Coordinate) -> f64 {
    distance_km(a, b) * KM_TO_NM
}

/// Initial bearing (forward azimuth) from `a` toward `b`.
///
/// Returns degrees in `[0, 360)`, clockwise from true north. Not symmetric:
/// the bearing at the far end of a long route generally differs.
pub fn initial_bearing(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let x = delta_lon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    let bearing = x.atan2(y).to_degrees();
    (bearing + 360.0) % 360.0
}

/// Point a fraction of the way along the great circle from `a` to `b`.
///
/// Uses spherical (slerp) interpolation, not linear lat/lon blending, so the
/// path is correct near the poles and across the antimeridian. `fraction` is
/// clamped to `[0, 1]`; 0 returns `a` exactly and 1 returns `b` exactly.
pub fn interpolate(a: Coordinate, b: Coordinate, fraction: f64) -> Coordinate {
    let fraction = fraction.clamp(0.0, 1.0);
    if fraction == 0.0 {
        return a;
    }
    if fraction == 1.0 {
        return b;
    }

    let lat1 = a.latitude.to_radians();
    let lon1 = a.longitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let lon2 = b.longitude.to_radians();

    // Angular distance between the endpoints
    let delta = distance_km(a, b) / EARTH_RADIUS_KM;
    if delta.abs() < MIN_ANGULAR_DISTANCE {
        // Coincident (or antipodal-degenerate) endpoints
        return a;
    }

    let sin_delta = delta.sin();
    let w1 = ((1.0 - fraction) * delta).sin() / sin_delta;
    let w2 = (fraction * delta).sin() / sin_delta;

    let x = w1 * lat1.cos() * lon1.cos() + w2 * lat2.cos() * lon2.cos();
    let y = w1 * lat1.cos() * lon1.sin() + w2 * lat2.cos() * lon2.sin();
    let z = w1 * lat1.sin() + w2 * lat2.sin();

    let lat = z.atan2((x * x + y * y).sqrt());
    let lon = y.atan2(x);

    Coordinate::new(lat.to_degrees(), lon.to_degrees())
}

/// Generate `n` evenly spaced points along the great circle from `a` to `b`.
///
/// The first point is `a` and the last is `b`; intermediate points are
/// spaced by equal fractions. `n` is clamped to a minimum of 2. Consumed by
/// the presentation layer for route polylines.
pub fn generate_path(a: Coordinate, b: Coordinate, n: usize) -> Vec<Coordinate> {
    let n = n.max(2);
    (0..n)
        .map(|i| interpolate(a, b, i as f64 / (n - 1) as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// O'Hare (Chicago).
    const ORD: Coordinate = Coordinate {
        latitude: 41.9742,
        longitude: -87.9073,
    };

    /// Narita (Tokyo).
    const NRT: Coordinate = Coordinate {
        latitude: 35.7647,
        longitude: 140.3864,
    };

    /// Heathrow (London).
    const LHR: Coordinate = Coordinate {
        latitude: 51.4700,
        longitude: -0.4543,
    };

    #[test]
    fn test_distance_to_self_is_zero() {
        assert!(distance_km(ORD, ORD).abs() < 1e-9);
        assert!(distance_km(NRT, NRT).abs() < 1e-9);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let ab = distance_km(ORD, NRT);
        let ba = distance_km(NRT, ORD);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_distance_known_route() {
        // ORD-LHR is roughly 6,350 km
        let d = distance_km(ORD, LHR);
        assert!(d > 6_200.0 && d < 6_500.0, "unexpected distance {d}");
    }

    #[test]
    fn test_distance_nm_conversion() {
        let km = distance_km(ORD, NRT);
        let nm = distance_nm(ORD, NRT);
        assert!((nm - km * KM_TO_NM).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_in_range() {
        for (a, b) in [(ORD, NRT), (NRT, ORD), (ORD, LHR), (LHR, NRT)] {
            let brg = initial_bearing(a, b);
            assert!((0.0..360.0).contains(&brg), "bearing {brg} out of range");
        }
    }

    #[test]
    fn test_bearing_not_symmetric() {
        let ab = initial_bearing(ORD, LHR);
        let ba = initial_bearing(LHR, ORD);
        assert!((ab - ba).abs() > 1.0);
    }

    #[test]
    fn test_bearing_due_east_at_equator() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 10.0);
        assert!((initial_bearing(a, b) - 90.0).abs() < 1e-6);
        assert!((initial_bearing(b, a) - 270.0).abs() < 1e-6);
    }

    #[test]
    fn test_interpolate_endpoints_exact() {
        let start = interpolate(ORD, NRT, 0.0);
        let end = interpolate(ORD, NRT, 1.0);
        assert_eq!(start, ORD);
        assert_eq!(end, NRT);
    }

    #[test]
    fn test_interpolate_identical_points() {
        let mid = interpolate(ORD, ORD, 0.5);
        assert_eq!(mid, ORD);
    }

    #[test]
    fn test_interpolate_midpoint_on_great_circle() {
        let mid = interpolate(ORD, NRT, 0.5);
        let to_mid = distance_km(ORD, mid);
        let from_mid = distance_km(mid, NRT);
        let total = distance_km(ORD, NRT);

        // Midpoint splits the route evenly and lies on the path
        assert!((to_mid - from_mid).abs() < 1.0);
        assert!((to_mid + from_mid - total).abs() < 1.0);
    }

    #[test]
    fn test_interpolate_not_linear_blend() {
        // ORD-NRT crosses near the Arctic; the great-circle midpoint is far
        // north of the linear lat/lon average.
        let mid = interpolate(ORD, NRT, 0.5);
        let linear_lat = (ORD.latitude + NRT.latitude) / 2.0;
        assert!(mid.latitude > linear_lat + 10.0);
    }

    #[test]
    fn test_interpolate_monotonic_progress() {
        let mut previous = 0.0;
        for i in 0..=20 {
            let f = i as f64 / 20.0;
            let p = interpolate(ORD, NRT, f);
            let travelled = distance_km(ORD, p);
            assert!(
                travelled >= previous - 1e-6,
                "distance regressed at fraction {f}"
            );
            previous = travelled;
        }
    }

    #[test]
    fn test_interpolate_clamps_fraction() {
        assert_eq!(interpolate(ORD, NRT, -0.5), ORD);
        assert_eq!(interpolate(ORD, NRT, 1.5), NRT);
    }

    #[test]
    fn test_generate_path_endpoints_and_count() {
        let path = generate_path(ORD, NRT, 11);
        assert_eq!(path.len(), 11);
        assert_eq!(path[0], ORD);
        assert_eq!(path[10], NRT);
    }

    #[test]
    fn test_generate_path_minimum_two_points() {
        let path = generate_path(ORD, NRT, 0);
        assert_eq!(path.len(), 2);
        assert_eq!(path[0], ORD);
        assert_eq!(path[1], NRT);
    }

    #[test]
    fn test_path_crosses_antimeridian_cleanly() {
        // Tokyo to Los Angeles crosses the antimeridian; every interpolated
        // longitude must stay in [-180, 180].
        let lax = Coordinate::new(33.9425, -118.408);
        for p in generate_path(NRT, lax, 50) {
            assert!((-180.0..=180.0).contains(&p.longitude));
            assert!((-90.0..=90.0).contains(&p.latitude));
        }
    }
}
