use crate::core::distance::distance_km;
use crate::core::filters::primary_location;
use crate::models::{Company, JobCategory, JobPosting, Location};
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Seed catalog shipped with the service
const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// Errors that can occur while loading the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
}

/// Read-only access to the postal-code table
pub trait LocationRepository {
    fn all_locations(&self) -> &[Location];

    fn find_by_postal_code(&self, postal_code: &str) -> Option<&Location> {
        self.all_locations()
            .iter()
            .find(|loc| loc.postal_code == postal_code)
    }

    /// Case-insensitive substring match on the city name
    fn find_by_city(&self, city: &str) -> Vec<&Location> {
        let needle = city.trim().to_lowercase();
        self.all_locations()
            .iter()
            .filter(|loc| loc.city.to_lowercase().contains(&needle))
            .collect()
    }

    /// Autocomplete search over city, postal code and canton
    ///
    /// Queries shorter than two characters return nothing. Exact city or
    /// postal-code hits come first, then major cities, otherwise table order.
    fn search(&self, query: &str) -> Vec<&Location> {
        let needle = query.trim().to_lowercase();
        if needle.chars().count() < 2 {
            return Vec::new();
        }

        let mut results: Vec<&Location> = self
            .all_locations()
            .iter()
            .filter(|loc| {
                loc.city.to_lowercase().contains(&needle)
                    || loc.postal_code.contains(&needle)
                    || loc.canton.to_lowercase().contains(&needle)
            })
            .collect();

        let is_exact = |loc: &Location| loc.city.to_lowercase() == needle || loc.postal_code == needle;
        results.sort_by(|a, b| {
            is_exact(b)
                .cmp(&is_exact(a))
                .then_with(|| b.major_city.cmp(&a.major_city))
        });

        results
    }
}

/// Read-only access to professions, companies and postings
pub trait CatalogRepository {
    fn job_categories(&self) -> &[JobCategory];
    fn companies(&self) -> &[Company];
    fn job_postings(&self) -> &[JobPosting];

    fn job_category(&self, id: &str) -> Option<&JobCategory> {
        self.job_categories().iter().find(|job| job.id == id)
    }

    fn company(&self, id: &str) -> Option<&Company> {
        self.companies().iter().find(|company| company.id == id)
    }

    /// A posting is usable only if both its profession and company exist
    fn is_well_formed(&self, posting: &JobPosting) -> bool {
        let valid = self.job_category(&posting.job_category_id).is_some()
            && self.company(&posting.company_id).is_some();
        if !valid {
            tracing::warn!(
                posting_id = %posting.id,
                category_id = %posting.job_category_id,
                company_id = %posting.company_id,
                "Skipping posting with dangling catalog reference"
            );
        }
        valid
    }

    fn postings_for_category(&self, category_id: &str) -> Vec<&JobPosting> {
        self.job_postings()
            .iter()
            .filter(|posting| posting.job_category_id == category_id)
            .filter(|posting| self.is_well_formed(posting))
            .collect()
    }

    fn postings_for_company(&self, company_id: &str) -> Vec<&JobPosting> {
        self.job_postings()
            .iter()
            .filter(|posting| posting.company_id == company_id)
            .filter(|posting| self.is_well_formed(posting))
            .collect()
    }

    /// Companies with at least one usable posting for a profession, in catalog order
    fn companies_for_category(&self, category_id: &str) -> Vec<&Company> {
        let postings = self.postings_for_category(category_id);
        self.companies()
            .iter()
            .filter(|company| postings.iter().any(|posting| posting.company_id == company.id))
            .collect()
    }

    /// Posting for a specific profession at a specific company, if any
    fn posting_for(&self, category_id: &str, company_id: &str) -> Option<&JobPosting> {
        self.postings_for_category(category_id)
            .into_iter()
            .find(|posting| posting.company_id == company_id)
    }

    /// Related professions; unknown ids are ignored
    fn related_jobs(&self, category: &JobCategory) -> Vec<&JobCategory> {
        category
            .related_jobs
            .iter()
            .filter_map(|id| self.job_category(id))
            .collect()
    }
}

/// Postings within `max_distance_km` (inclusive) of `origin`, nearest first
///
/// Postings whose location, company or profession cannot be resolved are skipped.
pub fn postings_near<'a, C>(
    catalog: &'a C,
    origin: &Location,
    max_distance_km: u32,
) -> Vec<(&'a JobPosting, u32)>
where
    C: CatalogRepository + LocationRepository + ?Sized,
{
    let mut nearby: Vec<(&JobPosting, u32)> = catalog
        .job_postings()
        .iter()
        .filter(|posting| catalog.is_well_formed(posting))
        .filter_map(|posting| {
            let Some(location) = catalog.find_by_postal_code(&posting.location) else {
                tracing::warn!(posting_id = %posting.id, postal_code = %posting.location, "Unknown posting location");
                return None;
            };
            let distance = distance_km(origin.coordinates, location.coordinates);
            (distance <= max_distance_km).then_some((posting, distance))
        })
        .collect();

    nearby.sort_by_key(|(_, distance)| *distance);
    nearby
}

/// A company training a given profession, with its postings for it
#[derive(Debug, Clone)]
pub struct CompanyOffer<'a> {
    pub company: &'a Company,
    pub postings: Vec<&'a JobPosting>,
    /// Distance from the origin to the company's primary site
    pub distance_km: Option<u32>,
}

/// Companies offering `category_id`, nearest first
///
/// Distance is measured to each company's primary site. Companies without a
/// resolvable site sort after the measured ones. Without an origin, or among
/// equal distances, companies are ordered by name.
pub fn companies_offering<'a, C>(
    catalog: &'a C,
    category_id: &str,
    origin: Option<&Location>,
) -> Vec<CompanyOffer<'a>>
where
    C: CatalogRepository + LocationRepository + ?Sized,
{
    let postings = catalog.postings_for_category(category_id);

    let mut offers: Vec<CompanyOffer<'a>> = catalog
        .companies_for_category(category_id)
        .into_iter()
        .map(|company| {
            let distance = origin
                .zip(primary_location(catalog, company))
                .map(|(origin, site)| distance_km(origin.coordinates, site.coordinates));
            CompanyOffer {
                company,
                postings: postings
                    .iter()
                    .copied()
                    .filter(|posting| posting.company_id == company.id)
                    .collect(),
                distance_km: distance,
            }
        })
        .collect();

    offers.sort_by(|a, b| {
        let by_distance = match (a.distance_km, b.distance_km) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_distance.then_with(|| a.company.name.to_lowercase().cmp(&b.company.name.to_lowercase()))
    });

    offers
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogData {
    #[serde(default)]
    locations: Vec<Location>,
    #[serde(default)]
    job_categories: Vec<JobCategory>,
    #[serde(default)]
    companies: Vec<Company>,
    #[serde(default)]
    job_postings: Vec<JobPosting>,
}

/// Catalog held entirely in memory, indexed by id
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    locations: Vec<Location>,
    job_categories: Vec<JobCategory>,
    companies: Vec<Company>,
    job_postings: Vec<JobPosting>,
    postal_index: HashMap<String, usize>,
    category_index: HashMap<String, usize>,
    company_index: HashMap<String, usize>,
}

impl InMemoryCatalog {
    pub fn new(
        locations: Vec<Location>,
        job_categories: Vec<JobCategory>,
        companies: Vec<Company>,
        job_postings: Vec<JobPosting>,
    ) -> Result<Self, CatalogError> {
        let postal_index = build_index("location", &locations, |loc| &loc.postal_code)?;
        let category_index = build_index("job category", &job_categories, |job| &job.id)?;
        let company_index = build_index("company", &companies, |company| &company.id)?;
        build_index("job posting", &job_postings, |posting| &posting.id)?;

        let catalog = Self {
            locations,
            job_categories,
            companies,
            job_postings,
            postal_index,
            category_index,
            company_index,
        };
        catalog.warn_unresolved_locations();

        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::new(data.locations, data.job_categories, data.companies, data.job_postings)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Catalog compiled into the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    fn warn_unresolved_locations(&self) {
        for company in &self.companies {
            for postal_code in &company.locations {
                if !self.postal_index.contains_key(postal_code) {
                    tracing::warn!(company_id = %company.id, %postal_code, "Company references unknown postal code");
                }
            }
        }
    }
}

fn build_index<T>(
    kind: &'static str,
    items: &[T],
    key: impl Fn(&T) -> &String,
) -> Result<HashMap<String, usize>, CatalogError> {
    let mut index = HashMap::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let id = key(item);
        if index.insert(id.clone(), position).is_some() {
            return Err(CatalogError::DuplicateId { kind, id: id.clone() });
        }
    }
    Ok(index)
}

impl LocationRepository for InMemoryCatalog {
    fn all_locations(&self) -> &[Location] {
        &self.locations
    }

    fn find_by_postal_code(&self, postal_code: &str) -> Option<&Location> {
        self.postal_index.get(postal_code).map(|&i| &self.locations[i])
    }
}

impl CatalogRepository for InMemoryCatalog {
    fn job_categories(&self) -> &[JobCategory] {
        &self.job_categories
    }

    fn companies(&self) -> &[Company] {
        &self.companies
    }

    fn job_postings(&self) -> &[JobPosting] {
        &self.job_postings
    }

    fn job_category(&self, id: &str) -> Option<&JobCategory> {
        self.category_index.get(id).map(|&i| &self.job_categories[i])
    }

    fn company(&self, id: &str) -> Option<&Company> {
        self.company_index.get(id).map(|&i| &self.companies[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::builtin().expect("builtin catalog should load")
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = catalog();
        assert_eq!(catalog.job_categories().len(), 6);
        assert!(catalog.companies().len() >= 50);
        assert_eq!(catalog.job_postings().len(), 3);
        assert!(catalog.all_locations().len() > 60);
    }

    #[test]
    fn test_find_by_postal_code() {
        let catalog = catalog();
        let st_gallen = catalog.find_by_postal_code("9000").unwrap();
        assert_eq!(st_gallen.city, "St. Gallen");
        assert_eq!(st_gallen.region, "Ostschweiz");
        assert!(st_gallen.major_city);
        assert!(catalog.find_by_postal_code("0000").is_none());
    }

    #[test]
    fn test_find_by_city_is_case_insensitive() {
        let catalog = catalog();
        let results = catalog.find_by_city("  LUZERN ");
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|loc| loc.city == "Luzern"));
    }

    #[test]
    fn test_search_orders_exact_then_major() {
        let catalog = catalog();
        let results = catalog.search("basel");
        assert!(!results.is_empty());
        assert_eq!(results[0].postal_code, "4001");

        assert!(catalog.search("b").is_empty());
        assert!(catalog.search(" ").is_empty());
    }

    #[test]
    fn test_search_by_postal_prefix() {
        let catalog = catalog();
        let results = catalog.search("90");
        assert!(results.iter().all(|loc| loc.postal_code.contains("90")));
        assert_eq!(results[0].postal_code, "9000");
    }

    #[test]
    fn test_related_jobs_skip_unknown_ids() {
        let catalog = catalog();
        let informatiker = catalog.job_category("informatiker-efz").unwrap();
        let related = catalog.related_jobs(informatiker);
        // elektroniker-efz is referenced but not part of the catalog
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, "mediamatiker-efz");
    }

    #[test]
    fn test_postings_for_company() {
        let catalog = catalog();
        let postings = catalog.postings_for_company("st-galler-kantonalbank");
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].job_category_id, "kauffrau-efz");
        assert!(catalog.posting_for("kauffrau-efz", "st-galler-kantonalbank").is_some());
        assert!(catalog.posting_for("kauffrau-efz", "ubs-basel").is_none());
    }

    #[test]
    fn test_dangling_postings_are_skipped() {
        let json = serde_json::json!({
            "locations": [
                { "postalCode": "9000", "city": "St. Gallen", "canton": "SG",
                  "coordinates": { "lat": 47.4239, "lng": 9.3767 }, "region": "Ostschweiz" }
            ],
            "jobCategories": [],
            "companies": [],
            "jobPostings": [
                { "id": "orphan", "jobCategoryId": "missing", "companyId": "missing",
                  "title": "Orphan", "location": "9000", "startDate": "2024-08-01",
                  "applicationDeadline": "2024-03-31", "salaryRange": "CHF 700/Monat",
                  "postedDate": "2024-01-01" }
            ]
        });
        let catalog = InMemoryCatalog::from_json(&json.to_string()).unwrap();
        let origin = catalog.find_by_postal_code("9000").unwrap().clone();

        assert!(catalog.postings_for_category("missing").is_empty());
        assert!(postings_near(&catalog, &origin, 100).is_empty());
    }

    #[test]
    fn test_postings_near() {
        let catalog = catalog();
        let st_gallen = catalog.find_by_postal_code("9000").unwrap().clone();
        let geneva = catalog.find_by_postal_code("1200").unwrap().clone();

        let nearby = postings_near(&catalog, &st_gallen, 100);
        assert_eq!(nearby.len(), 3);
        assert!(nearby.iter().all(|(_, distance)| *distance == 0));

        assert!(postings_near(&catalog, &geneva, 100).is_empty());
    }

    fn offering_catalog() -> InMemoryCatalog {
        let json = serde_json::json!({
            "locations": [
                { "postalCode": "9000", "city": "St. Gallen", "canton": "SG",
                  "coordinates": { "lat": 47.4239, "lng": 9.3767 }, "region": "Ostschweiz" },
                { "postalCode": "8001", "city": "Zürich", "canton": "ZH",
                  "coordinates": { "lat": 47.3769, "lng": 8.5417 }, "region": "Zürich" }
            ],
            "jobCategories": [
                { "id": "it", "title": "Informatiker/in EFZ", "description": "Software",
                  "averageSalary": { "apprentice": "CHF 800", "junior": "CHF 5000", "senior": "CHF 8000" },
                  "duration": "4 Jahre", "schoolDays": 1, "workDays": 4, "industry": "IT & Software" },
                { "id": "kv", "title": "Kauffrau/Kaufmann EFZ", "description": "Büro",
                  "averageSalary": { "apprentice": "CHF 700", "junior": "CHF 4500", "senior": "CHF 7000" },
                  "duration": "3 Jahre", "schoolDays": 1, "workDays": 4, "industry": "Banking & Finance" }
            ],
            "companies": [
                { "id": "zeta", "name": "Zeta Systems", "size": "mittel", "employees": 80, "locations": ["9000"] },
                { "id": "beta", "name": "beta labs", "size": "klein", "employees": 12, "locations": ["1234"] },
                { "id": "alpha", "name": "Alpha Informatik", "size": "gross", "employees": 400, "locations": ["0000", "8001"] },
                { "id": "office", "name": "Aaa Office", "size": "klein", "employees": 5, "locations": ["8001"] },
                { "id": "idle", "name": "Idle AG", "size": "klein", "employees": 5, "locations": ["8001"] }
            ],
            "jobPostings": [
                { "id": "zeta-it", "jobCategoryId": "it", "companyId": "zeta", "title": "Informatiker/in",
                  "location": "9000", "startDate": "2024-08-01", "applicationDeadline": "2024-03-31",
                  "salaryRange": "CHF 800/Monat", "postedDate": "2024-01-01" },
                { "id": "beta-it", "jobCategoryId": "it", "companyId": "beta", "title": "Informatiker/in",
                  "location": "9000", "startDate": "2024-08-01", "applicationDeadline": "2024-03-31",
                  "salaryRange": "CHF 800/Monat", "postedDate": "2024-01-01" },
                { "id": "alpha-it-1", "jobCategoryId": "it", "companyId": "alpha", "title": "Applikationsentwicklung",
                  "location": "8001", "startDate": "2024-08-01", "applicationDeadline": "2024-03-31",
                  "salaryRange": "CHF 850/Monat", "postedDate": "2024-01-01" },
                { "id": "alpha-it-2", "jobCategoryId": "it", "companyId": "alpha", "title": "Plattformentwicklung",
                  "location": "8001", "startDate": "2024-08-01", "applicationDeadline": "2024-03-31",
                  "salaryRange": "CHF 850/Monat", "postedDate": "2024-01-01" },
                { "id": "office-kv", "jobCategoryId": "kv", "companyId": "office", "title": "Kauffrau/Kaufmann",
                  "location": "8001", "startDate": "2024-08-01", "applicationDeadline": "2024-03-31",
                  "salaryRange": "CHF 700/Monat", "postedDate": "2024-01-01" }
            ]
        });
        InMemoryCatalog::from_json(&json.to_string()).unwrap()
    }

    #[test]
    fn test_companies_for_category() {
        let catalog = offering_catalog();
        let ids: Vec<&str> = catalog
            .companies_for_category("it")
            .iter()
            .map(|company| company.id.as_str())
            .collect();

        assert_eq!(ids, vec!["zeta", "beta", "alpha"]);
        assert!(catalog.companies_for_category("unknown").is_empty());
    }

    #[test]
    fn test_companies_offering_nearest_first() {
        let catalog = offering_catalog();
        let zurich = catalog.find_by_postal_code("8001").unwrap().clone();

        let offers = companies_offering(&catalog, "it", Some(&zurich));
        let ids: Vec<&str> = offers.iter().map(|offer| offer.company.id.as_str()).collect();

        // alpha's first site does not resolve, so 8001 is its primary one
        assert_eq!(ids, vec!["alpha", "zeta", "beta"]);
        assert_eq!(offers[0].distance_km, Some(0));
        assert!(offers[1].distance_km.is_some_and(|d| (61..=67).contains(&d)));
        assert_eq!(offers[2].distance_km, None);
        assert_eq!(offers[0].postings.len(), 2);
        assert!(offers.iter().flat_map(|o| &o.postings).all(|p| p.job_category_id == "it"));
    }

    #[test]
    fn test_companies_offering_without_location_sorts_by_name() {
        let catalog = offering_catalog();

        let offers = companies_offering(&catalog, "it", None);
        let names: Vec<&str> = offers.iter().map(|offer| offer.company.name.as_str()).collect();

        assert_eq!(names, vec!["Alpha Informatik", "beta labs", "Zeta Systems"]);
        assert!(offers.iter().all(|offer| offer.distance_km.is_none()));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = serde_json::json!({
            "companies": [
                { "id": "dup", "name": "A", "size": "klein", "employees": 10, "locations": [] },
                { "id": "dup", "name": "B", "size": "klein", "employees": 10, "locations": [] }
            ]
        });
        let err = InMemoryCatalog::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { kind: "company", .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = InMemoryCatalog::from_path("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
