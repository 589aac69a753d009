use crate::core::distance::distance_km;
use crate::models::Location;

/// Proximity score (0-100) for a workplace relative to the user's home
///
/// Same-region workplaces fall off more slowly than cross-region ones.
/// Bands are strict upper bounds on the rounded kilometer distance.
pub fn region_score(user_location: &Location, job_location: &Location) -> u8 {
    let distance = distance_km(user_location.coordinates, job_location.coordinates);
    score_for_distance(distance, user_location.region == job_location.region)
}

#[inline]
pub fn score_for_distance(distance_km: u32, same_region: bool) -> u8 {
    if same_region {
        return match distance_km {
            d if d < 25 => 95,
            d if d < 50 => 85,
            d if d < 75 => 75,
            _ => 65,
        };
    }

    match distance_km {
        d if d < 100 => 60,
        d if d < 150 => 45,
        d if d < 200 => 30,
        _ => 15,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;

    fn location(postal_code: &str, region: &str, lat: f64, lng: f64) -> Location {
        Location {
            postal_code: postal_code.to_string(),
            city: "Test".to_string(),
            canton: "ZH".to_string(),
            coordinates: Coordinates::new(lat, lng),
            region: region.to_string(),
            major_city: false,
        }
    }

    #[test]
    fn test_same_region_bands() {
        assert_eq!(score_for_distance(10, true), 95);
        assert_eq!(score_for_distance(24, true), 95);
        assert_eq!(score_for_distance(25, true), 85);
        assert_eq!(score_for_distance(60, true), 75);
        assert_eq!(score_for_distance(75, true), 65);
        assert_eq!(score_for_distance(300, true), 65);
    }

    #[test]
    fn test_cross_region_bands() {
        assert_eq!(score_for_distance(0, false), 60);
        assert_eq!(score_for_distance(100, false), 45);
        assert_eq!(score_for_distance(120, false), 45);
        assert_eq!(score_for_distance(150, false), 30);
        assert_eq!(score_for_distance(200, false), 15);
        assert_eq!(score_for_distance(500, false), 15);
    }

    #[test]
    fn test_region_score_uses_region_and_distance() {
        let zurich = location("8001", "Zürich", 47.3769, 8.5417);
        let winterthur = location("8400", "Zürich", 47.5009, 8.7243);
        let st_gallen = location("9000", "Ostschweiz", 47.4239, 9.3767);

        // ~19 km inside the same region
        assert_eq!(region_score(&zurich, &winterthur), 95);
        // ~64 km across regions
        assert_eq!(region_score(&zurich, &st_gallen), 60);
        assert_eq!(region_score(&zurich, &zurich), 95);
    }
}
