//! OpenWeatherMap client
//!
//! Implements [`WeatherProvider`] over the geocoding, current weather and
//! air pollution endpoints. Every request carries the `appid` credential and
//! is bounded by the configured timeout.

use super::{AirQualityReading, GeocodeResult, WeatherError, WeatherProvider, WeatherReading};
use crate::config::CoreSettings;
use crate::i18n::LanguageCode;
use crate::utils::truncate_str;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const GEOCODE_PATH: &str = "/geo/1.0/direct";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";

/// Longest error body kept for diagnostics
const ERROR_BODY_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
struct GeocodeEntry {
    lat: f64,
    lon: f64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    main: Option<MainBlock>,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionResponse {
    #[serde(default)]
    list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionEntry {
    main: AirPollutionMain,
}

#[derive(Debug, Deserialize)]
struct AirPollutionMain {
    aqi: i64,
}

/// HTTP client for an OpenWeatherMap-compatible API
#[derive(Clone)]
pub struct OpenWeatherClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    /// Create a client from core settings.
    #[must_use]
    pub fn new(settings: &CoreSettings) -> Self {
        let http = create_http_client(settings.weather_http_timeout());
        Self::with_client(http, &settings.weather_api_base_url, &settings.weather_api_key)
    }

    /// Create a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(http: HttpClient, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WeatherError::Network(format!("request to {path} timed out"))
                } else {
                    WeatherError::Network(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Proxies sometimes answer with an HTML error page
            let is_html = error_text.trim_start().starts_with("<!DOCTYPE")
                || error_text.trim_start().starts_with("<html")
                || error_text.trim_start().starts_with("<HTML");

            let body = if is_html {
                "(server returned HTML error page)".to_string()
            } else if error_text.chars().count() > ERROR_BODY_LIMIT {
                format!("{}... (truncated)", truncate_str(&error_text, ERROR_BODY_LIMIT))
            } else {
                error_text
            };

            warn!("Provider returned {status} for {path}: {body}");
            return Err(WeatherError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::Json(e.without_url().to_string()))
    }
}

/// Creates an HTTP client bounded by `timeout`.
///
/// Falls back to a default client if the builder fails.
#[must_use]
pub fn create_http_client(timeout: Duration) -> HttpClient {
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Failed to build weather HTTP client, using defaults: {e}");
            HttpClient::new()
        })
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<GeocodeResult>, WeatherError> {
        let entries: Vec<GeocodeEntry> = self
            .get_json(
                GEOCODE_PATH,
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        debug!("Geocoding '{query}' returned {} match(es)", entries.len());

        Ok(entries
            .into_iter()
            .map(|entry| GeocodeResult {
                latitude: entry.lat,
                longitude: entry.lon,
                name: entry.name.unwrap_or_default(),
                country: entry.country.unwrap_or_default(),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
        lang: LanguageCode,
    ) -> Result<WeatherReading, WeatherError> {
        let response: CurrentWeatherResponse = self
            .get_json(
                CURRENT_WEATHER_PATH,
                &[
                    ("lat", latitude.to_string()),
                    ("lon", longitude.to_string()),
                    ("units", "metric".to_string()),
                    ("lang", lang.as_code().to_string()),
                ],
            )
            .await?;

        let main = response.main.ok_or(WeatherError::MissingField("main.temp"))?;
        let description = response
            .weather
            .into_iter()
            .next()
            .and_then(|condition| condition.description)
            .ok_or(WeatherError::MissingField("weather[0].description"))?;

        Ok(WeatherReading {
            temperature_celsius: main.temp,
            description,
        })
    }

    #[instrument(skip(self))]
    async fn air_quality(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AirQualityReading, WeatherError> {
        let response: AirPollutionResponse = self
            .get_json(
                AIR_POLLUTION_PATH,
                &[("lat", latitude.to_string()), ("lon", longitude.to_string())],
            )
            .await?;

        let entry = response
            .list
            .into_iter()
            .next()
            .ok_or(WeatherError::MissingField("list[0].main.aqi"))?;

        Ok(AirQualityReading {
            aqi_level: entry.main.aqi,
        })
    }
}
