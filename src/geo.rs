//! Great-circle distance on a spherical Earth.
//!
//! Ellipsoidal correction is ignored; at Taiwan's latitudes the error is far
//! below the match radius. Elevation is ignored too, so distances are purely
//! horizontal.

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance in meters between two coordinates given in decimal degrees.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Whether a coordinate is finite and inside the WGS84 degree ranges.
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [(f64, f64); 5] = [
        (23.47, 120.957),
        (24.3895, 121.2342),
        (23.60, 121.10),
        (0.0, 0.0),
        (-33.8688, 151.2093),
    ];

    #[test]
    fn test_identity_is_zero() {
        for (lat, lon) in SAMPLES {
            assert_eq!(haversine_distance(lat, lon, lat, lon), 0.0);
        }
    }

    #[test]
    fn test_symmetry() {
        for (lat1, lon1) in SAMPLES {
            for (lat2, lon2) in SAMPLES {
                let ab = haversine_distance(lat1, lon1, lat2, lon2);
                let ba = haversine_distance(lat2, lon2, lat1, lon1);
                assert!((ab - ba).abs() < 1e-6, "{ab} != {ba}");
            }
        }
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // R * pi / 180
        let d = haversine_distance(23.0, 121.0, 24.0, 121.0);
        assert!((d - 111_194.93).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_yu_shan_to_xue_shan() {
        // Roughly 105 km apart
        let d = haversine_distance(23.47, 120.957, 24.3895, 121.2342);
        assert!(d > 100_000.0 && d < 110_000.0, "got {d}");
    }

    #[test]
    fn test_coordinate_validity() {
        assert!(is_valid_coordinate(23.47, 120.957));
        assert!(is_valid_coordinate(-90.0, 180.0));
        assert!(!is_valid_coordinate(90.5, 0.0));
        assert!(!is_valid_coordinate(0.0, -180.1));
        assert!(!is_valid_coordinate(f64::NAN, 0.0));
        assert!(!is_valid_coordinate(0.0, f64::INFINITY));
    }
}
