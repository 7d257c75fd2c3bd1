// src/main.rs

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use moodflow::config::EngineConfig;
use moodflow::engine::{EngineReply, ResponseEngine};

struct AppState {
    engine: ResponseEngine,
    tz_offset_hours: i64,
}

impl AppState {
    /// Local civil time with the configured fixed offset applied; the engine
    /// itself is timezone-agnostic.
    fn local_now(&self) -> NaiveDateTime {
        (Utc::now() + chrono::Duration::hours(self.tz_offset_hours)).naive_utc()
    }
}

#[derive(Deserialize)]
struct MessageRequest {
    user_id: String,
    text: String,
}

#[derive(Deserialize)]
struct LocationRequest {
    user_id: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    city: String,
}

async fn health() -> &'static str {
    "OK"
}

async fn message_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MessageRequest>,
) -> Json<EngineReply> {
    let reply = state
        .engine
        .handle_message(&req.user_id, &req.text, state.local_now())
        .await;
    Json(reply)
}

async fn location_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LocationRequest>,
) -> Json<serde_json::Value> {
    let text = state
        .engine
        .handle_location_shared(&req.user_id, req.lat, req.lon, &req.city)
        .await;
    Json(serde_json::json!({ "text": text }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = EngineConfig::from_env();
    info!("Starting MoodFlow response engine");
    info!(
        "Weather lookups: {}",
        if config.owm_api_key.is_some() { "enabled" } else { "disabled (no OWM_API_KEY)" }
    );

    let state = Arc::new(AppState {
        engine: ResponseEngine::from_config(&config)?,
        tz_offset_hours: config.tz_offset_hours,
    });

    let app = Router::new()
        .route("/", get(health))
        .route("/message", post(message_handler))
        .route("/location", post(location_handler))
        .with_state(state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
