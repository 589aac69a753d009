use std::fmt;
use crate::core::distance::distance_km;
use crate::models::{Company, Industry, Location};
use crate::services::catalog::LocationRepository;

/// Decides whether a company plausibly trains apprentices for an industry
pub trait CompanyRelevance: fmt::Debug + Send + Sync {
    fn is_relevant(&self, industry: Industry, company: &Company) -> bool;
}

/// Name-based relevance: a company is relevant when its lowercase name
/// contains one of the industry's keywords. Industries without keywords
/// accept every company.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordRelevance;

impl KeywordRelevance {
    pub fn keywords(industry: Industry) -> &'static [&'static str] {
        match industry {
            Industry::ItSoftware => &["tech", "digital", "solutions"],
            Industry::BankingFinance => &["bank", "ubs", "credit"],
            Industry::Healthcare => &["spital", "gesundheit", "klinik"],
            Industry::MechanicalEngineering => &["precision", "engineering", "tools"],
            Industry::MediaDesign => &["creative", "media", "studio"],
            Industry::TransportLogistics => &["logistics", "transport", "post"],
            Industry::Other => &[],
        }
    }
}

impl CompanyRelevance for KeywordRelevance {
    fn is_relevant(&self, industry: Industry, company: &Company) -> bool {
        let keywords = Self::keywords(industry);
        if keywords.is_empty() {
            return true;
        }

        let name = company.name.to_lowercase();
        keywords.iter().any(|keyword| name.contains(keyword))
    }
}

/// Company whose primary site has been resolved
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub company: &'a Company,
    pub location: &'a Location,
    pub distance_km: u32,
}

/// First resolvable location of a company
#[inline]
pub fn primary_location<'a, L>(locations: &'a L, company: &Company) -> Option<&'a Location>
where
    L: LocationRepository + ?Sized,
{
    company
        .locations
        .iter()
        .find_map(|postal_code| locations.find_by_postal_code(postal_code))
}

/// Build the candidate set for a user
///
/// All companies in the user's region come first (catalog order), followed
/// by at most `max_out_of_region` companies from other regions whose primary
/// site is within `radius_km` (inclusive). Companies without a resolvable
/// location are skipped.
pub fn candidate_companies<'a, L>(
    locations: &'a L,
    companies: &'a [Company],
    user_location: &Location,
    radius_km: u32,
    max_out_of_region: usize,
) -> Vec<Candidate<'a>>
where
    L: LocationRepository + ?Sized,
{
    let resolved: Vec<Candidate<'a>> = companies
        .iter()
        .filter_map(|company| {
            let Some(location) = primary_location(locations, company) else {
                tracing::warn!(company_id = %company.id, "Skipping company without resolvable location");
                return None;
            };
            Some(Candidate {
                company,
                location,
                distance_km: distance_km(user_location.coordinates, location.coordinates),
            })
        })
        .collect();

    let (in_region, out_of_region): (Vec<_>, Vec<_>) = resolved
        .into_iter()
        .partition(|candidate| candidate.location.region == user_location.region);

    let nearby = out_of_region
        .into_iter()
        .filter(|candidate| candidate.distance_km <= radius_km)
        .take(max_out_of_region);

    in_region.into_iter().chain(nearby).collect()
}

/// Pick up to `limit` companies for an industry
///
/// Takes the first `limit` relevant candidates; if fewer than `limit` are
/// relevant, falls back to the first `limit` candidates regardless.
pub fn select_companies<'c, 'a>(
    candidates: &'c [Candidate<'a>],
    industry: Industry,
    relevance: &dyn CompanyRelevance,
    limit: usize,
) -> Vec<&'c Candidate<'a>> {
    let relevant: Vec<&Candidate<'a>> = candidates
        .iter()
        .filter(|candidate| relevance.is_relevant(industry, candidate.company))
        .collect();

    if relevant.len() >= limit {
        relevant.into_iter().take(limit).collect()
    } else {
        candidates.iter().take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;

    struct Locations(Vec<Location>);

    impl LocationRepository for Locations {
        fn all_locations(&self) -> &[Location] {
            &self.0
        }
    }

    fn location(postal_code: &str, region: &str, lat: f64, lng: f64) -> Location {
        Location {
            postal_code: postal_code.to_string(),
            city: format!("City {}", postal_code),
            canton: "XX".to_string(),
            coordinates: Coordinates::new(lat, lng),
            region: region.to_string(),
            major_city: false,
        }
    }

    fn company(id: &str, name: &str, postal_code: &str) -> Company {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "size": "mittel",
            "employees": 100,
            "locations": [postal_code]
        }))
        .unwrap()
    }

    fn locations() -> Locations {
        Locations(vec![
            location("8001", "Zürich", 47.3769, 8.5417),
            location("9000", "Ostschweiz", 47.4239, 9.3767),
            location("1200", "Romandie", 46.2044, 6.1432),
        ])
    }

    #[test]
    fn test_keyword_relevance() {
        let relevance = KeywordRelevance;
        let bank = company("b", "Basler Kantonalbank", "8001");
        let clinic = company("k", "Klinik Hirslanden", "8001");

        assert!(relevance.is_relevant(Industry::BankingFinance, &bank));
        assert!(!relevance.is_relevant(Industry::BankingFinance, &clinic));
        assert!(relevance.is_relevant(Industry::Healthcare, &clinic));
        assert!(relevance.is_relevant(Industry::Other, &clinic));
    }

    #[test]
    fn test_candidates_region_first_then_nearby() {
        let locations = locations();
        let companies = vec![
            company("sg", "St. Gallen Tech", "9000"),
            company("zh", "Zürich Tech", "8001"),
            company("ge", "Genève Tech", "1200"),
            company("nowhere", "Ghost Tech", "0000"),
        ];
        let user = locations.0[0].clone();

        let candidates = candidate_companies(&locations, &companies, &user, 150, 8);
        let ids: Vec<&str> = candidates.iter().map(|c| c.company.id.as_str()).collect();

        // Geneva is ~224 km away, the ghost company has no location
        assert_eq!(ids, vec!["zh", "sg"]);
        assert_eq!(candidates[0].distance_km, 0);
    }

    #[test]
    fn test_out_of_region_cap() {
        let locations = locations();
        let companies: Vec<Company> = (0..12)
            .map(|i| company(&format!("sg{}", i), "Ostschweiz AG", "9000"))
            .collect();
        let user = locations.0[0].clone();

        let candidates = candidate_companies(&locations, &companies, &user, 150, 8);
        assert_eq!(candidates.len(), 8);
    }

    #[test]
    fn test_select_falls_back_to_first_candidates() {
        let locations = locations();
        let companies = vec![
            company("a", "Alpha Bank", "8001"),
            company("b", "Beta Media", "8001"),
            company("c", "Gamma Tools", "8001"),
            company("d", "Delta Credit", "8001"),
        ];
        let user = locations.0[0].clone();
        let candidates = candidate_companies(&locations, &companies, &user, 150, 8);

        // Only two banks, so the first three candidates are used instead
        let selected = select_companies(&candidates, Industry::BankingFinance, &KeywordRelevance, 3);
        let ids: Vec<&str> = selected.iter().map(|c| c.company.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let selected = select_companies(&candidates, Industry::BankingFinance, &KeywordRelevance, 2);
        let ids: Vec<&str> = selected.iter().map(|c| c.company.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn test_select_with_empty_candidates() {
        let selected = select_companies(&[], Industry::ItSoftware, &KeywordRelevance, 3);
        assert!(selected.is_empty());
    }
}
