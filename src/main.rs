use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use apprentice_match::config::Settings;
use apprentice_match::core::Matcher;
use apprentice_match::routes::{self, matches::AppState};
use apprentice_match::services::{CatalogRepository, InMemoryCatalog, LocationRepository, ResultCache};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path parameter errors
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format {
        "pretty" => subscriber.pretty().init(),
        "full" => subscriber.init(),
        _ => subscriber.compact().init(),
    }
}

fn to_io_error<E: std::fmt::Display>(context: &str, err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration before logging so its level and format apply
    let settings = Settings::load();
    let (log_level, log_format) = match &settings {
        Ok(settings) => (settings.logging.level.clone(), settings.logging.format.clone()),
        Err(_) => ("info".to_string(), "compact".to_string()),
    };
    let log_level = std::env::var("LOG_LEVEL").unwrap_or(log_level);
    let log_format = std::env::var("LOG_FORMAT").unwrap_or(log_format);
    init_tracing(&log_level, &log_format);

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        to_io_error("Configuration error", e)
    })?;

    info!("Starting apprentice matching service...");

    // Load reference data
    let catalog = match &settings.catalog.path {
        Some(path) => {
            info!("Loading catalog from {}", path.display());
            InMemoryCatalog::from_path(path)
        }
        None => InMemoryCatalog::builtin(),
    }
    .map_err(|e| {
        error!("Failed to load catalog: {}", e);
        to_io_error("Catalog error", e)
    })?;

    info!(
        "Catalog loaded ({} locations, {} professions, {} companies, {} postings)",
        catalog.all_locations().len(),
        catalog.job_categories().len(),
        catalog.companies().len(),
        catalog.job_postings().len()
    );

    let cache = Arc::new(ResultCache::new(settings.cache.capacity, settings.cache.ttl_secs));
    info!(
        "Result cache initialized ({} entries, TTL: {}s)",
        settings.cache.capacity, settings.cache.ttl_secs
    );

    // Initialize matcher with configured weights
    let weights = settings.weights();
    let matcher = Matcher::new(weights, settings.matching.options());

    info!("Matcher initialized with weights: {:?}", weights);

    // Build application state
    let app_state = AppState {
        catalog: Arc::new(catalog),
        cache,
        matcher,
        simulated_delay: Duration::from_millis(settings.matching.simulated_delay_ms),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
