// tests/owm_client_test.rs

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moodflow::weather::owm::OwmClient;
use moodflow::weather::{GeocodeProvider, ProviderError, WeatherProvider};

fn client(server: &MockServer, retries: u32) -> OwmClient {
    OwmClient::new(
        Some("test-key".to_string()),
        Duration::from_secs(2),
        retries,
        Duration::from_millis(10),
    )
    .unwrap()
    .with_base_url(server.uri())
}

fn weather_body() -> serde_json::Value {
    json!({
        "weather": [{"main": "Clear", "description": "晴天"}],
        "main": {"temp": 21.6},
        "name": "Tokyo"
    })
}

#[tokio::test]
async fn weather_response_is_mapped_and_rounded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client(&server, 0)
        .current_conditions(35.6895, 139.6917)
        .await
        .unwrap();

    assert_eq!(snapshot.tag, "clear");
    assert_eq!(snapshot.description, "晴天");
    assert_eq!(snapshot.temp_c, 22);
    assert_eq!(snapshot.city, "Tokyo");
}

#[tokio::test]
async fn transient_errors_are_retried_until_success() {
    let server = MockServer::start().await;
    // First two attempts fail, the third succeeds.
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client(&server, 2)
        .current_conditions(35.0, 139.0)
        .await
        .unwrap();
    assert_eq!(snapshot.tag, "clear");
}

#[tokio::test]
async fn exhausted_retries_surface_the_last_error() {
    let server = MockServer::start().await;
    // retries = 1 means exactly two attempts.
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let err = client(&server, 1)
        .current_conditions(35.0, 139.0)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Status(s) if s.as_u16() == 500));
}

#[tokio::test]
async fn geocode_maps_the_best_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "東京"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": 35.6895, "lon": 139.6917, "name": "Tokyo"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let geo = client(&server, 0).resolve("東京").await.unwrap();
    assert_eq!(geo.city, "Tokyo");
    assert!((geo.lat - 35.6895).abs() < 1e-9);
    assert!((geo.lon - 139.6917).abs() < 1e-9);
}

#[tokio::test]
async fn geocode_empty_result_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, 0).resolve("Nonexistentplacexyz").await.unwrap_err();
    assert!(matches!(err, ProviderError::NotFound));
}

#[tokio::test]
async fn missing_credential_short_circuits_without_io() {
    let server = MockServer::start().await;
    // Any request reaching the server would fail the expectation.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = OwmClient::new(None, Duration::from_secs(2), 2, Duration::from_millis(10))
        .unwrap()
        .with_base_url(server.uri());

    let weather_err = client.current_conditions(35.0, 139.0).await.unwrap_err();
    assert!(matches!(weather_err, ProviderError::MissingCredential));

    let geo_err = client.resolve("東京").await.unwrap_err();
    assert!(matches!(geo_err, ProviderError::MissingCredential));
}
