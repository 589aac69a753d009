use actix_web::{web, HttpResponse, Responder};
use crate::models::{
    CompanyDetailResponse, ErrorResponse, JobCompaniesQuery, JobDetailResponse, LocationSearchQuery,
    LocationSearchResponse, NearbyPosting, NearbyPostingsQuery, OfferingCompany,
};
use crate::routes::matches::AppState;
use crate::services::{companies_offering, postings_near, CatalogRepository, LocationRepository};

/// Suggestions returned by the postal-code autocomplete
pub const MAX_LOCATION_SUGGESTIONS: usize = 6;

/// Default radius for the nearby-postings lookup
pub const DEFAULT_NEARBY_DISTANCE_KM: u32 = 100;

/// Configure reference-data routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/locations/search", web::get().to(search_locations))
        .route("/locations/{postal_code}", web::get().to(get_location))
        .route("/jobs", web::get().to(list_jobs))
        .route("/jobs/{id}", web::get().to(get_job))
        .route("/jobs/{id}/companies", web::get().to(job_companies))
        .route("/companies/{id}", web::get().to(get_company))
        .route("/postings/nearby", web::get().to(nearby_postings));
}

fn not_found(what: &str, id: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: format!("{} not found", what),
        message: format!("No {} with id {}", what.to_lowercase(), id),
        status_code: 404,
    })
}

/// Postal-code / city autocomplete
///
/// GET /api/v1/locations/search?q=st.%20gallen
async fn search_locations(
    state: web::Data<AppState>,
    query: web::Query<LocationSearchQuery>,
) -> impl Responder {
    let query = query.into_inner().q;
    let results = state
        .catalog
        .search(&query)
        .into_iter()
        .take(MAX_LOCATION_SUGGESTIONS)
        .cloned()
        .collect();

    HttpResponse::Ok().json(LocationSearchResponse { query, results })
}

async fn get_location(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let postal_code = path.into_inner();
    match state.catalog.find_by_postal_code(&postal_code) {
        Some(location) => HttpResponse::Ok().json(location),
        None => not_found("Location", &postal_code),
    }
}

async fn list_jobs(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.catalog.job_categories())
}

/// Profession detail with its postings and related professions
///
/// GET /api/v1/jobs/{id}
async fn get_job(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    let Some(job) = state.catalog.job_category(&id) else {
        return not_found("Job", &id);
    };

    HttpResponse::Ok().json(JobDetailResponse {
        job: job.clone(),
        postings: state.catalog.postings_for_category(&id).into_iter().cloned().collect(),
        related_jobs: state.catalog.related_jobs(job).into_iter().cloned().collect(),
    })
}

/// Companies training a profession, nearest to `postalCode` first
///
/// An unknown or missing postal code lists the companies by name.
///
/// GET /api/v1/jobs/{id}/companies?postalCode=9000
async fn job_companies(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<JobCompaniesQuery>,
) -> impl Responder {
    let id = path.into_inner();
    if state.catalog.job_category(&id).is_none() {
        return not_found("Job", &id);
    }

    let origin = query
        .postal_code
        .as_deref()
        .and_then(|postal_code| state.catalog.find_by_postal_code(postal_code));

    let companies: Vec<OfferingCompany> = companies_offering(state.catalog.as_ref(), &id, origin)
        .into_iter()
        .map(|offer| OfferingCompany {
            company: offer.company.clone(),
            postings: offer.postings.into_iter().cloned().collect(),
            distance_km: offer.distance_km,
        })
        .collect();

    HttpResponse::Ok().json(companies)
}

/// Company detail with resolved sites and postings
///
/// GET /api/v1/companies/{id}
async fn get_company(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    let Some(company) = state.catalog.company(&id) else {
        return not_found("Company", &id);
    };

    let locations = company
        .locations
        .iter()
        .filter_map(|postal_code| state.catalog.find_by_postal_code(postal_code))
        .cloned()
        .collect();

    HttpResponse::Ok().json(CompanyDetailResponse {
        company: company.clone(),
        locations,
        postings: state.catalog.postings_for_company(&id).into_iter().cloned().collect(),
    })
}

/// Postings within a radius of a postal code, nearest first
///
/// GET /api/v1/postings/nearby?postalCode=9000&maxDistanceKm=50
async fn nearby_postings(
    state: web::Data<AppState>,
    query: web::Query<NearbyPostingsQuery>,
) -> impl Responder {
    let Some(origin) = state.catalog.find_by_postal_code(&query.postal_code) else {
        return not_found("Location", &query.postal_code);
    };
    let max_distance_km = query.max_distance_km.unwrap_or(DEFAULT_NEARBY_DISTANCE_KM);

    let postings: Vec<NearbyPosting> = postings_near(state.catalog.as_ref(), origin, max_distance_km)
        .into_iter()
        .map(|(posting, distance_km)| NearbyPosting {
            posting: posting.clone(),
            distance_km,
        })
        .collect();

    HttpResponse::Ok().json(postings)
}
