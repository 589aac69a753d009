use crate::models::Coordinates;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two coordinates, rounded to whole kilometers
///
/// Inputs are not range-checked.
#[inline]
pub fn distance_km(a: Coordinates, b: Coordinates) -> u32 {
    haversine_distance(a.lat, a.lng, b.lat, b.lng).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZURICH: Coordinates = Coordinates::new(47.3769, 8.5417);
    const ST_GALLEN: Coordinates = Coordinates::new(47.4239, 9.3767);
    const GENEVA: Coordinates = Coordinates::new(46.2044, 6.1432);

    #[test]
    fn test_haversine_distance() {
        // Zürich to Geneva is approximately 224 km as the crow flies
        let distance = haversine_distance(ZURICH.lat, ZURICH.lng, GENEVA.lat, GENEVA.lng);
        assert!((distance - 224.0).abs() < 10.0, "Distance should be ~224km, got {}", distance);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance_km(ZURICH, ZURICH), 0);
        assert_eq!(distance_km(GENEVA, GENEVA), 0);
    }

    #[test]
    fn test_zurich_st_gallen() {
        let distance = distance_km(ZURICH, ST_GALLEN);
        assert!((61..=67).contains(&distance), "Expected ~64km, got {}", distance);
    }

    #[test]
    fn test_symmetry() {
        let there = distance_km(ZURICH, GENEVA) as i64;
        let back = distance_km(GENEVA, ZURICH) as i64;
        assert!((there - back).abs() <= 1);
    }
}
