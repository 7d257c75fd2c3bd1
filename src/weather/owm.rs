// src/weather/owm.rs
// OpenWeatherMap client implementing both provider seams.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{GeocodeProvider, GeocodeResult, ProviderError, WeatherProvider, WeatherSnapshot};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

pub struct OwmClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    retries: u32,
    backoff: Duration,
}

impl OwmClient {
    /// Build a client with a per-attempt timeout enforced by reqwest.
    /// `api_key = None` disables both lookups without attempting network I/O.
    pub fn new(
        api_key: Option<String>,
        timeout: Duration,
        retries: u32,
        backoff: Duration,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("MoodFlowBot/1.0")
            .build()?;
        Ok(Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            retries,
            backoff,
        })
    }

    /// Point the client at a different host. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ProviderError::MissingCredential)
    }

    /// GET with bounded retry: `retries + 1` attempts, fixed backoff between
    /// attempts. Every failure class (connect, timeout, bad status, decode)
    /// is retried; the last error is returned once attempts are exhausted.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_err: Option<ProviderError> = None;

        for attempt in 0..=self.retries {
            if attempt > 0 {
                tokio::time::sleep(self.backoff).await;
            }
            let outcome = match self.http.get(&url).query(query).send().await {
                Ok(resp) if resp.status().is_success() => match resp.json::<T>().await {
                    Ok(v) => return Ok(v),
                    Err(e) => ProviderError::Decode(e.to_string()),
                },
                Ok(resp) => ProviderError::Status(resp.status()),
                Err(e) => ProviderError::Network(e),
            };
            debug!("OWM request failed (attempt {}): {}", attempt + 1, outcome);
            last_err = Some(outcome);
        }

        let err = last_err.unwrap_or_else(|| ProviderError::Decode("no attempts made".into()));
        warn!("OWM request exhausted retries: {} ({})", err, path);
        Err(err)
    }
}

#[derive(Deserialize)]
struct OwmWeatherResponse {
    weather: Vec<OwmCondition>,
    main: OwmMain,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct OwmCondition {
    main: String,
    description: String,
}

#[derive(Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Deserialize)]
struct OwmGeoEntry {
    lat: f64,
    lon: f64,
    #[serde(default)]
    name: String,
}

#[async_trait]
impl WeatherProvider for OwmClient {
    async fn current_conditions(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherSnapshot, ProviderError> {
        let key = self.key()?.to_string();
        let query = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("units", "metric".to_string()),
            ("lang", "ja".to_string()),
            ("appid", key),
        ];
        let resp: OwmWeatherResponse = self.get_json("/data/2.5/weather", &query).await?;
        let cond = resp
            .weather
            .first()
            .ok_or_else(|| ProviderError::Decode("empty weather array".into()))?;
        Ok(WeatherSnapshot {
            tag: cond.main.to_lowercase(),
            description: cond.description.clone(),
            temp_c: resp.main.temp.round() as i32,
            city: resp.name,
            fetched_at: Utc::now(),
        })
    }
}

#[async_trait]
impl GeocodeProvider for OwmClient {
    async fn resolve(&self, query: &str) -> Result<GeocodeResult, ProviderError> {
        let key = self.key()?.to_string();
        let params = [
            ("q", query.to_string()),
            ("limit", "1".to_string()),
            ("appid", key),
        ];
        let entries: Vec<OwmGeoEntry> = self.get_json("/geo/1.0/direct", &params).await?;
        let top = entries.into_iter().next().ok_or(ProviderError::NotFound)?;
        Ok(GeocodeResult {
            lat: top.lat,
            lon: top.lon,
            city: if top.name.is_empty() {
                query.to_string()
            } else {
                top.name
            },
            fetched_at: Utc::now(),
        })
    }
}
