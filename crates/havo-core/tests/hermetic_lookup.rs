use havo_core::i18n::LanguageCode;
use havo_core::weather::openweather::create_http_client;
use havo_core::weather::{
    FailureKind, LookupOutcome, OpenWeatherClient, WeatherLookupService, PROVIDER_ERROR_MESSAGE,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "hermetic-key";

fn service_for(server: &MockServer, timeout: Duration) -> WeatherLookupService<OpenWeatherClient> {
    let client =
        OpenWeatherClient::with_client(create_http_client(timeout), &server.uri(), API_KEY);
    WeatherLookupService::new(client)
}

async fn mount_tashkent_geocode(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Tashkent"))
        .and(query_param("limit", "1"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Tashkent", "lat": 41.3111, "lon": 69.2797, "country": "UZ" }
        ])))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_tashkent_weather(server: &MockServer, lang: &str) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "41.3111"))
        .and(query_param("lon", "69.2797"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", lang))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "main": { "temp": 22.5 },
            "weather": [{ "description": "ochiq" }]
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_air_quality(server: &MockServer, aqi: i64) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .and(query_param("lat", "41.3111"))
        .and(query_param("lon", "69.2797"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [{ "main": { "aqi": aqi } }]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_tashkent_uzbek_end_to_end() {
    let server = MockServer::start().await;
    mount_tashkent_geocode(&server).await;
    mount_tashkent_weather(&server, "uz").await;
    mount_air_quality(&server, 2).await;

    let outcome = service_for(&server, Duration::from_secs(5))
        .lookup("Tashkent", LanguageCode::Uz)
        .await;

    assert!(outcome.is_success(), "unexpected outcome: {outcome:?}");
    let text = outcome.text();
    assert!(text.contains("🌍 Tashkent, UZ"));
    assert!(text.contains("Ob-havo: 22.5°C"));
    assert!(text.contains("ochiq"));
    assert!(text.contains("Havo sifati: Qoniqarli 🙂 (AQI: 2)"));
}

#[tokio::test]
async fn test_unknown_city_makes_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Zzzyzx"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = service_for(&server, Duration::from_secs(5))
        .lookup("Zzzyzx", LanguageCode::En)
        .await;

    assert_eq!(
        outcome,
        LookupOutcome::Failure {
            kind: FailureKind::CityNotFound,
            text: "❌ City not found: Zzzyzx".to_string(),
        }
    );

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_server_error_hides_details() {
    let server = MockServer::start().await;
    mount_tashkent_geocode(&server).await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let outcome = service_for(&server, Duration::from_secs(5))
        .lookup("Tashkent", LanguageCode::En)
        .await;

    assert_eq!(outcome.text(), PROVIDER_ERROR_MESSAGE);
    assert!(!outcome.text().contains("upstream"));
}

#[tokio::test]
async fn test_aqi_six_is_provider_error() {
    let server = MockServer::start().await;
    mount_tashkent_geocode(&server).await;
    mount_tashkent_weather(&server, "ru").await;
    mount_air_quality(&server, 6).await;

    let outcome = service_for(&server, Duration::from_secs(5))
        .lookup("Tashkent", LanguageCode::Ru)
        .await;

    assert_eq!(
        outcome,
        LookupOutcome::Failure {
            kind: FailureKind::ProviderError,
            text: PROVIDER_ERROR_MESSAGE.to_string(),
        }
    );
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let outcome = service_for(&server, Duration::from_millis(200))
        .lookup("Tashkent", LanguageCode::En)
        .await;

    assert_eq!(outcome.text(), PROVIDER_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_unreachable_provider_is_provider_error() {
    // Nothing listens on port 9 of localhost
    let client = OpenWeatherClient::with_client(
        create_http_client(Duration::from_secs(2)),
        "http://127.0.0.1:9",
        API_KEY,
    );

    let outcome = WeatherLookupService::new(client)
        .lookup("Tashkent", LanguageCode::Uz)
        .await;

    assert_eq!(outcome.text(), PROVIDER_ERROR_MESSAGE);
}
