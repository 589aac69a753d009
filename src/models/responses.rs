use serde::{Deserialize, Serialize};
use crate::models::domain::{Company, JobCategory, JobPosting, Location, MatchResult};

/// Response for the generate and fetch endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateMatchesResponse {
    #[serde(rename = "resultId")]
    pub result_id: String,
    pub matches: Vec<MatchResult>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "cachedResults")]
    pub cached_results: u64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSearchResponse {
    pub query: String,
    pub results: Vec<Location>,
}

/// Profession detail page payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetailResponse {
    pub job: JobCategory,
    pub postings: Vec<JobPosting>,
    #[serde(rename = "relatedJobs")]
    pub related_jobs: Vec<JobCategory>,
}

/// Company detail page payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyDetailResponse {
    pub company: Company,
    pub locations: Vec<Location>,
    pub postings: Vec<JobPosting>,
}

/// Posting with its distance from the queried postal code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyPosting {
    pub posting: JobPosting,
    #[serde(rename = "distanceKm")]
    pub distance_km: u32,
}

/// Company training a profession, with its distance from the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferingCompany {
    pub company: Company,
    pub postings: Vec<JobPosting>,
    #[serde(rename = "distanceKm", default)]
    pub distance_km: Option<u32>,
}
