//! Apprentice Match - apprenticeship matching service for Swiss school leavers
//!
//! This library scores a questionnaire profile against a catalog of
//! professions and training companies and returns the best professions,
//! each with its best-fitting companies nearby.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, MatchingOptions, JitterSource, RngJitter, distance::{haversine_distance, distance_km}};
pub use crate::models::{UserProfile, Location, MatchResult, ScoringWeights, GenerateMatchesRequest, GenerateMatchesResponse};
pub use crate::services::{InMemoryCatalog, CatalogRepository, LocationRepository};
