//! Great-circle distance.

use crate::domain::Coordinate;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in metres between two points given in decimal degrees,
/// on a sphere of radius [`EARTH_RADIUS_M`].
///
/// NaN inputs propagate to a NaN result.
///
/// # Examples
///
/// ```
/// use metro_finder::geo::haversine_meters;
///
/// assert_eq!(haversine_meters(22.5726, 88.3639, 22.5726, 88.3639), 0.0);
/// let d = haversine_meters(22.5726, 88.3639, 22.5448, 88.3426);
/// assert!((d - 3786.77).abs() < 0.01);
/// ```
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_with_radius(lat1, lon1, lat2, lon2, EARTH_RADIUS_M)
}

/// Haversine distance on a sphere of the given radius (same unit as result).
pub fn haversine_with_radius(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points. NaN stays NaN.
    let a = if a > 1.0 { 1.0 } else { a };
    let c = 2.0 * a.sqrt().asin();

    radius * c
}

/// Distance in metres between two coordinates on a sphere of the given radius.
pub fn distance_between(a: Coordinate, b: Coordinate, radius: f64) -> f64 {
    haversine_with_radius(a.latitude, a.longitude, b.latitude, b.longitude, radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn central_kolkata_fixture() {
        // Esplanade area to Park Street area.
        let d = haversine_meters(22.5726, 88.3639, 22.5448, 88.3426);
        assert!((d - 3786.770318).abs() < 0.001, "got {d}");
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_meters(22.0, 88.0, 23.0, 88.0);
        let expected = EARTH_RADIUS_M * 1.0f64.to_radians();
        assert!((d - expected).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn custom_radius_scales_linearly() {
        let metres = haversine_with_radius(22.5, 88.3, 22.6, 88.4, EARTH_RADIUS_M);
        let km = haversine_with_radius(22.5, 88.3, 22.6, 88.4, EARTH_RADIUS_M / 1000.0);
        assert!((metres / 1000.0 - km).abs() < 1e-9);
    }

    #[test]
    fn nan_propagates() {
        assert!(haversine_meters(f64::NAN, 88.0, 22.0, 88.0).is_nan());
    }

    #[test]
    fn coordinate_helper_matches_raw() {
        let a = Coordinate::new(22.4721796, 88.3952919);
        let b = Coordinate::new(22.48, 88.381);
        assert_eq!(
            distance_between(a, b, EARTH_RADIUS_M),
            haversine_meters(22.4721796, 88.3952919, 22.48, 88.381)
        );
    }
}
