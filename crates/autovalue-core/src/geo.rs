//! Great-circle distance between two coordinates.

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Haversine distance in miles between two `(latitude, longitude)` pairs in degrees.
pub fn haversine_miles(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // clamp guards against rounding pushing `a` just past 1.0 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();
    EARTH_RADIUS_MILES * c
}

/// True when both axes are inside their valid degree ranges.
pub fn valid_coordinates(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_miles_apart() {
        assert_eq!(haversine_miles((39.74, -104.99), (39.74, -104.99)), 0.0);
    }

    #[test]
    fn new_york_to_los_angeles_is_about_2450_miles() {
        let miles = haversine_miles((40.7128, -74.0060), (34.0522, -118.2437));
        assert!((miles - 2445.0).abs() < 15.0, "got {miles}");
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let miles = haversine_miles((0.0, 0.0), (0.0, 180.0));
        assert!(miles.is_finite());
        assert!((miles - EARTH_RADIUS_MILES * std::f64::consts::PI).abs() < 1.0);
    }

    #[test]
    fn coordinate_ranges() {
        assert!(valid_coordinates(90.0, -180.0));
        assert!(!valid_coordinates(91.0, 0.0));
        assert!(!valid_coordinates(0.0, 181.0));
    }
}
