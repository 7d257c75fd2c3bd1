// src/weather/mod.rs
// External lookup types and the provider seams the engine consumes.

pub mod owm;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One external weather reading. Immutable once fetched; freshness is owned
/// by the cache in front of the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Provider's primary condition keyword, lowercased (rain/clear/clouds/…).
    pub tag: String,
    /// Human-readable description in the provider's response language.
    pub description: String,
    /// Temperature rounded to whole degrees Celsius.
    pub temp_c: i32,
    /// Resolved place name, empty when the provider omits it.
    pub city: String,
    pub fetched_at: DateTime<Utc>,
}

/// One resolved place name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub lat: f64,
    pub lon: f64,
    pub city: String,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider credential not configured")]
    MissingCredential,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("provider returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to decode provider response: {0}")]
    Decode(String),
    #[error("no match for query")]
    NotFound,
}

impl ProviderError {
    /// Not-found is a user-facing outcome, everything else degrades silently.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound)
    }
}

/// Current-conditions lookup by coordinates.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_conditions(&self, lat: f64, lon: f64)
    -> Result<WeatherSnapshot, ProviderError>;
}

/// Free-text place resolution.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    async fn resolve(&self, query: &str) -> Result<GeocodeResult, ProviderError>;
}
