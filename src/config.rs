use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use crate::core::MatchingOptions;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

/// Reference data source; the built-in catalog is used when no path is set
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    pub nearby_radius_km: Option<u32>,
    pub max_out_of_region: Option<usize>,
    pub companies_per_category: Option<usize>,
    pub top_categories: Option<usize>,
    /// Artificial latency before results are returned
    #[serde(default)]
    pub simulated_delay_ms: u64,
}

impl MatchingSettings {
    pub fn options(&self) -> MatchingOptions {
        let defaults = MatchingOptions::default();
        MatchingOptions {
            nearby_radius_km: self.nearby_radius_km.unwrap_or(defaults.nearby_radius_km),
            max_out_of_region: self.max_out_of_region.unwrap_or(defaults.max_out_of_region),
            companies_per_category: self.companies_per_category.unwrap_or(defaults.companies_per_category),
            top_categories: self.top_categories.unwrap_or(defaults.top_categories),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_interest_weight")]
    pub interest: f64,
    #[serde(default = "default_skills_weight")]
    pub skills: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_preferences_weight")]
    pub preferences: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            interest: default_interest_weight(),
            skills: default_skills_weight(),
            location: default_location_weight(),
            preferences: default_preferences_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            interest: config.interest,
            skills: config.skills,
            location: config.location,
            preferences: config.preferences,
        }
    }
}

fn default_interest_weight() -> f64 { 0.4 }
fn default_skills_weight() -> f64 { 0.3 }
fn default_location_weight() -> f64 { 0.2 }
fn default_preferences_weight() -> f64 { 0.1 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_ttl() -> u64 { 3600 }
fn default_cache_capacity() -> u64 { 10_000 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with APPRENTICE__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., APPRENTICE__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        settings.try_deserialize::<Self>()?.validated()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize::<Self>()?.validated()
    }

    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let weights = self.weights();
        let all_positive = [weights.interest, weights.skills, weights.location, weights.preferences]
            .iter()
            .all(|weight| *weight >= 0.0);

        if !all_positive || !weights.is_normalized() {
            return Err(ConfigError::Message(format!(
                "scoring weights must be non-negative and sum to 1.0 (got {:.3})",
                weights.sum()
            )));
        }

        if self.cache.capacity == 0 {
            return Err(ConfigError::Message("cache.capacity must be greater than 0".to_string()));
        }

        Ok(self)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("APPRENTICE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
