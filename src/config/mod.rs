// src/config/mod.rs

use std::str::FromStr;
use std::time::Duration;

/// Engine and shim configuration, loaded from the environment. Constructed
/// once in `main` (or per test) and passed in; there is no global instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// OpenWeatherMap credential. Absence disables weather and geocode
    /// lookups entirely; both degrade to "unavailable" without network I/O.
    pub owm_api_key: Option<String>,

    // ── Fetch policy
    pub http_timeout_secs: u64,
    pub http_retries: u32,
    pub retry_backoff_ms: u64,

    // ── Cache TTLs
    pub weather_ttl_secs: u64,
    pub geocode_ttl_secs: u64,

    // ── Persistence
    pub store_path: String,

    // ── Transport shim
    pub tz_offset_hours: i64,
    pub host: String,
    pub port: u16,
}

fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            // Trim whitespace and strip trailing comments before parsing.
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    tracing::warn!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        // Pull in a .env file when present; plain env vars otherwise.
        let _ = dotenvy::dotenv();

        Self {
            owm_api_key: std::env::var("OWM_API_KEY")
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            http_timeout_secs: env_var_or("MOODFLOW_HTTP_TIMEOUT_SECS", 6),
            http_retries: env_var_or("MOODFLOW_HTTP_RETRIES", 2),
            retry_backoff_ms: env_var_or("MOODFLOW_RETRY_BACKOFF_MS", 600),
            weather_ttl_secs: env_var_or("MOODFLOW_WEATHER_TTL_SECS", 10 * 60),
            geocode_ttl_secs: env_var_or("MOODFLOW_GEOCODE_TTL_SECS", 24 * 60 * 60),
            store_path: env_var_or("MOODFLOW_STORE_PATH", "user_store.json".to_string()),
            tz_offset_hours: env_var_or("MOODFLOW_TZ_OFFSET_HOURS", 9),
            host: env_var_or("MOODFLOW_HOST", "0.0.0.0".to_string()),
            port: env_var_or("MOODFLOW_PORT", 10000),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn weather_ttl(&self) -> Duration {
        Duration::from_secs(self.weather_ttl_secs)
    }

    pub fn geocode_ttl(&self) -> Duration {
        Duration::from_secs(self.geocode_ttl_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for EngineConfig {
    /// Documented numeric defaults, independent of the process environment.
    fn default() -> Self {
        Self {
            owm_api_key: None,
            http_timeout_secs: 6,
            http_retries: 2,
            retry_backoff_ms: 600,
            weather_ttl_secs: 10 * 60,
            geocode_ttl_secs: 24 * 60 * 60,
            store_path: "user_store.json".to_string(),
            tz_offset_hours: 9,
            host: "0.0.0.0".to_string(),
            port: 10000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_fetch_policy() {
        let config = EngineConfig::default();
        assert_eq!(config.http_timeout(), Duration::from_secs(6));
        assert_eq!(config.http_retries, 2);
        assert_eq!(config.retry_backoff(), Duration::from_millis(600));
        assert_eq!(config.weather_ttl(), Duration::from_secs(600));
        assert_eq!(config.geocode_ttl(), Duration::from_secs(86_400));
        assert!(config.owm_api_key.is_none());
    }

    #[test]
    fn bind_address_joins_host_and_port() {
        let config = EngineConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..EngineConfig::default()
        };
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }
}
