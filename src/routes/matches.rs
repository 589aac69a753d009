use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{ErrorResponse, GenerateMatchesRequest, GenerateMatchesResponse, HealthResponse};
use crate::services::{CacheError, CacheKey, InMemoryCatalog, LocationRepository, ResultCache};
use crate::core::{Matcher, RngJitter};
use std::sync::Arc;
use std::time::Duration;

/// Message shown when the postal code could not be resolved
pub const NO_MATCHES_MESSAGE: &str =
    "Keine passenden Lehrstellen gefunden. Bitte überprüfe deine Postleitzahl.";

/// Message shown when the location is known but no training company is in reach
pub const NO_COMPANIES_NEARBY_MESSAGE: &str =
    "In deiner Nähe haben wir leider keine passenden Lehrbetriebe gefunden.";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<InMemoryCatalog>,
    pub cache: Arc<ResultCache>,
    pub matcher: Matcher,
    pub simulated_delay: Duration,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/generate", web::post().to(generate_matches))
        .route("/matches/{result_id}", web::get().to(get_result))
        .route("/matches/{result_id}", web::delete().to(delete_result));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cached_results: state.cache.stats().entries,
    })
}

/// Generate matches endpoint
///
/// POST /api/v1/matches/generate
///
/// Request body:
/// ```json
/// {
///   "firstName": "string",
///   "lastName": "string",
///   "age": 15,
///   "postalCode": "9000",
///   "interests": { "technik": 5, "kreativ": 3, "business": 2 },
///   "skills": ["teamarbeit", "genauigkeit", "kommunikation"],
///   "preferences": { "companySize": "mittel", "workEnvironment": "mixed", "commute": "kurz" },
///   "goals": ["sicherheit", "weiterbildung"],
///   "seed": 42
/// }
/// ```
async fn generate_matches(
    state: web::Data<AppState>,
    req: web::Json<GenerateMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for generate request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let request = req.into_inner();
    let seed = request.seed;

    // An unknown postal code behaves like a missing one: no location, no matches
    let location = request
        .postal_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .and_then(|code| {
            let location = state.catalog.find_by_postal_code(code).cloned();
            if location.is_none() {
                tracing::info!("Unknown postal code: {}", code);
            }
            location
        });
    let profile = request.into_profile(location);

    if !state.simulated_delay.is_zero() {
        tokio::time::sleep(state.simulated_delay).await;
    }

    let matches = match seed {
        Some(seed) => state
            .matcher
            .generate_matches(&profile, state.catalog.as_ref(), &mut RngJitter::seeded(seed)),
        None => state
            .matcher
            .generate_matches(&profile, state.catalog.as_ref(), &mut RngJitter::from_entropy()),
    };

    let response = GenerateMatchesResponse {
        result_id: uuid::Uuid::new_v4().to_string(),
        total_results: matches.len(),
        message: matches.is_empty().then(|| match profile.location {
            Some(_) => NO_COMPANIES_NEARBY_MESSAGE.to_string(),
            None => NO_MATCHES_MESSAGE.to_string(),
        }),
        matches,
        generated_at: chrono::Utc::now(),
    };

    if let Err(e) = state.cache.set(&CacheKey::results(&response.result_id), &response).await {
        tracing::warn!("Failed to cache result {}: {}", response.result_id, e);
    }

    tracing::info!(
        "Generated {} matches (result {}, postal code {:?})",
        response.total_results,
        response.result_id,
        profile.location.as_ref().map(|location| location.postal_code.as_str())
    );

    HttpResponse::Ok().json(response)
}

/// Fetch a previously generated result set
///
/// GET /api/v1/matches/{result_id}
async fn get_result(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let result_id = path.into_inner();

    match state.cache.get::<GenerateMatchesResponse>(&CacheKey::results(&result_id)).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(CacheError::CacheMiss(_)) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Result not found".to_string(),
            message: format!("No result with id {} (it may have expired)", result_id),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to read cached result {}: {}", result_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to read result".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Discard a result set
///
/// DELETE /api/v1/matches/{result_id}
async fn delete_result(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let result_id = path.into_inner();

    if state.cache.delete(&CacheKey::results(&result_id)).await {
        tracing::debug!("Deleted result {}", result_id);
        HttpResponse::NoContent().finish()
    } else {
        HttpResponse::NotFound().json(ErrorResponse {
            error: "Result not found".to_string(),
            message: format!("No result with id {}", result_id),
            status_code: 404,
        })
    }
}
