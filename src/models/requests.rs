use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};
use crate::models::domain::{InterestCategory, Location, Preferences, UserProfile};

/// Completed questionnaire submitted for matching
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "first_name", rename = "firstName")]
    pub first_name: String,
    #[validate(length(min = 1))]
    #[serde(alias = "last_name", rename = "lastName")]
    pub last_name: String,
    #[validate(range(min = 10, max = 30))]
    pub age: u8,
    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,
    #[serde(alias = "postal_code", rename = "postalCode", default)]
    pub postal_code: Option<String>,
    #[validate(length(min = 3), custom(function = "validate_ratings"))]
    pub interests: BTreeMap<InterestCategory, u8>,
    #[validate(length(min = 3))]
    pub skills: Vec<String>,
    pub preferences: Preferences,
    #[validate(length(min = 2))]
    pub goals: Vec<String>,
    #[serde(default)]
    pub avoidances: Vec<String>,
    /// Fixes the score jitter for reproducible results
    #[serde(default)]
    pub seed: Option<u64>,
}

fn validate_ratings(interests: &BTreeMap<InterestCategory, u8>) -> Result<(), ValidationError> {
    if interests.values().all(|rating| (1..=5).contains(rating)) {
        Ok(())
    } else {
        Err(ValidationError::new("rating_out_of_range"))
    }
}

impl GenerateMatchesRequest {
    /// Build the scoring profile once the postal code has been looked up
    pub fn into_profile(self, location: Option<Location>) -> UserProfile {
        UserProfile {
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            email: self.email,
            location,
            interests: self.interests,
            skills: self.skills,
            preferences: self.preferences,
            goals: self.goals,
            avoidances: self.avoidances,
        }
    }
}

/// Query for the postal-code autocomplete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyPostingsQuery {
    #[serde(alias = "postal_code", rename = "postalCode")]
    pub postal_code: String,
    #[serde(alias = "max_distance_km", rename = "maxDistanceKm", default)]
    pub max_distance_km: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobCompaniesQuery {
    #[serde(alias = "postal_code", rename = "postalCode", default)]
    pub postal_code: Option<String>,
}
