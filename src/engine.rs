// src/engine.rs
// Orchestrates one inbound message: command dispatch, cached lookups,
// reply composition, and recommendation selection.

use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::config::EngineConfig;
use crate::recommend::{self, RecommendationItem};
use crate::reply;
use crate::store::{UserLocation, UserLocationStore};
use crate::temporal;
use crate::weather::owm::OwmClient;
use crate::weather::{GeocodeProvider, GeocodeResult, ProviderError, WeatherProvider, WeatherSnapshot};
use crate::emotion;

const USAGE: &str = "📝 使い方\n\
    ・位置情報を送る → 天気連動\n\
    ・都市を設定 → 例: `loc 東京`\n\
    ・状態確認 → `status`\n\
    （普通に話しかけてもOKです）";

const LOC_NOT_FOUND: &str = "位置を見つけられませんでした。例：`loc 東京` と送ってください。";
const LOC_NOT_SET: &str = "現在、場所は未設定です。位置情報を送るか `loc 東京` と送ってください。";
const LOC_SAVED: &str = "📍 位置情報を保存しました。以後、その地域の天気に合わせて返答します。";
const SAVE_FAILED: &str = "保存に失敗しました。時間をおいてもう一度お試しください。";

/// What the transport layer gets back for one inbound message. The
/// recommendation, when present, is rendered channel-side.
#[derive(Debug, Clone, Serialize)]
pub struct EngineReply {
    pub text: String,
    pub recommendation: Option<RecommendationItem>,
}

impl EngineReply {
    fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            recommendation: None,
        }
    }
}

/// The response synthesis core. One instance is shared across all concurrent
/// requests; the caches and the store carry their own locking.
pub struct ResponseEngine {
    weather_provider: Arc<dyn WeatherProvider>,
    geocode_provider: Arc<dyn GeocodeProvider>,
    weather_cache: TtlCache<(i64, i64), WeatherSnapshot>,
    geocode_cache: TtlCache<String, GeocodeResult>,
    store: UserLocationStore,
    // Seedable so tests can pin line/item selection.
    rng: Mutex<StdRng>,
}

impl ResponseEngine {
    pub fn new(
        config: &EngineConfig,
        weather_provider: Arc<dyn WeatherProvider>,
        geocode_provider: Arc<dyn GeocodeProvider>,
    ) -> Self {
        Self {
            weather_provider,
            geocode_provider,
            weather_cache: TtlCache::new(config.weather_ttl()),
            geocode_cache: TtlCache::new(config.geocode_ttl()),
            store: UserLocationStore::new(config.store_path.clone()),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Wire both provider seams to a single OpenWeatherMap client.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ProviderError> {
        let client = Arc::new(OwmClient::new(
            config.owm_api_key.clone(),
            config.http_timeout(),
            config.http_retries,
            config.retry_backoff(),
        )?);
        Ok(Self::new(config, client.clone(), client))
    }

    /// Replace the selection RNG. Test seam.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Handle one inbound text message. `now` is local civil time (the
    /// transport applies the fixed UTC offset). Never fails: every path
    /// terminates in a valid reply.
    pub async fn handle_message(&self, user_id: &str, text: &str, now: NaiveDateTime) -> EngineReply {
        let trimmed = text.trim();
        let lowered = trimmed.to_lowercase();

        if matches!(lowered.as_str(), "help" | "？" | "ヘルプ") {
            return EngineReply::text_only(USAGE);
        }
        if lowered == "status" {
            return EngineReply::text_only(self.status_text(user_id).await);
        }
        if lowered.starts_with("loc ") || lowered.starts_with("loc:") {
            let query = parse_loc_query(trimmed);
            return EngineReply::text_only(self.set_location_by_name(user_id, query).await);
        }

        self.converse(user_id, trimmed, now).await
    }

    /// Persist a shared location (e.g. a location message from the channel).
    pub async fn handle_location_shared(
        &self,
        user_id: &str,
        lat: f64,
        lon: f64,
        city: &str,
    ) -> String {
        let location = UserLocation {
            lat,
            lon,
            city: city.to_string(),
        };
        match self.store.set(user_id, location).await {
            Ok(()) => {
                info!("stored shared location for user {}", user_id);
                LOC_SAVED.to_string()
            }
            Err(e) => {
                warn!("failed to persist shared location: {}", e);
                SAVE_FAILED.to_string()
            }
        }
    }

    async fn converse(&self, user_id: &str, text: &str, now: NaiveDateTime) -> EngineReply {
        let ctx = temporal::classify(now);

        // Store lock is released before any network call.
        let location = self.store.get(user_id).await;
        let weather = match &location {
            Some(loc) => self.weather_for(loc).await,
            None => None,
        };

        let emotion = emotion::score(text);
        let weather_tag = weather.as_ref().map(|w| w.tag.as_str());

        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let reply_text = reply::compose(text, weather.as_ref(), ctx, &mut *rng);
        let recommendation = recommend::select(ctx.block, emotion, weather_tag, &mut *rng);

        EngineReply {
            text: reply_text,
            recommendation,
        }
    }

    async fn status_text(&self, user_id: &str) -> String {
        let Some(location) = self.store.get(user_id).await else {
            return LOC_NOT_SET.to_string();
        };
        match self.weather_for(&location).await {
            Some(w) => format!(
                "📍 設定: {} / 天気: {}（{}℃）",
                location.city, w.description, w.temp_c
            ),
            None => format!("📍 設定: {} / 天気: 取得できませんでした。", location.city),
        }
    }

    async fn set_location_by_name(&self, user_id: &str, query: &str) -> String {
        if query.is_empty() {
            return LOC_NOT_FOUND.to_string();
        }
        match self.geocode_for(query).await {
            Ok(geo) => {
                let city = geo.city.clone();
                let location = UserLocation {
                    lat: geo.lat,
                    lon: geo.lon,
                    city: geo.city,
                };
                match self.store.set(user_id, location).await {
                    Ok(()) => format!("📍 場所を「{}」に設定しました。", city),
                    Err(e) => {
                        warn!("failed to persist location for {}: {}", user_id, e);
                        SAVE_FAILED.to_string()
                    }
                }
            }
            Err(e) => {
                if !e.is_not_found() {
                    debug!("geocode degraded for {:?}: {}", query, e);
                }
                LOC_NOT_FOUND.to_string()
            }
        }
    }

    /// Weather through the TTL cache. Transient failures degrade to `None`
    /// and are never surfaced to the user.
    async fn weather_for(&self, location: &UserLocation) -> Option<WeatherSnapshot> {
        let key = weather_key(location.lat, location.lon);
        let provider = self.weather_provider.clone();
        let (lat, lon) = (location.lat, location.lon);
        match self
            .weather_cache
            .get_or_fetch(key, || async move { provider.current_conditions(lat, lon).await })
            .await
        {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                debug!("weather unavailable for ({}, {}): {}", lat, lon, e);
                None
            }
        }
    }

    async fn geocode_for(&self, query: &str) -> Result<GeocodeResult, ProviderError> {
        let key = query.trim().to_lowercase();
        let provider = self.geocode_provider.clone();
        let owned = query.trim().to_string();
        self.geocode_cache
            .get_or_fetch(key, || async move { provider.resolve(&owned).await })
            .await
    }
}

/// Round coordinates to 4 decimals (scaled integers) so near-identical
/// repeated coordinates share one cache entry.
fn weather_key(lat: f64, lon: f64) -> (i64, i64) {
    (
        (lat * 10_000.0).round() as i64,
        (lon * 10_000.0).round() as i64,
    )
}

/// Accepts `loc <query>` and `loc:<query>`; the command match upstream is
/// case-insensitive.
fn parse_loc_query(text: &str) -> &str {
    let rest = &text[3..];
    rest.strip_prefix(':').unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_keys_merge_float_noise() {
        assert_eq!(
            weather_key(35.68950, 139.69170),
            weather_key(35.689501, 139.691699)
        );
        assert_ne!(weather_key(35.6895, 139.6917), weather_key(35.6896, 139.6917));
    }

    #[test]
    fn loc_query_parsing() {
        assert_eq!(parse_loc_query("loc 東京"), "東京");
        assert_eq!(parse_loc_query("loc:東京"), "東京");
        assert_eq!(parse_loc_query("loc:  大阪 "), "大阪");
        assert_eq!(parse_loc_query("loc "), "");
    }
}
