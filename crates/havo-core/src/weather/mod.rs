//! Weather provider client and lookup pipeline
//!
//! The three provider calls (geocoding, current weather, air pollution) sit
//! behind [`WeatherProvider`]; [`WeatherLookupService`] chains them into one
//! localized summary.

/// Lookup pipeline turning a city query into a reply text
pub mod lookup;
/// OpenWeatherMap HTTP implementation of the provider
pub mod openweather;

pub use lookup::{
    city_not_found_message, compose_summary, FailureKind, LookupOutcome, WeatherLookupService,
    PROVIDER_ERROR_MESSAGE,
};
pub use openweather::OpenWeatherClient;

use crate::i18n::LanguageCode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the weather provider
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection failure or timeout
    #[error("Network error: {0}")]
    Network(String),
    /// Provider answered with a non-success status
    #[error("API error: {status} - {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, truncated for logging
        body: String,
    },
    /// Response body was not the expected JSON
    #[error("JSON error: {0}")]
    Json(String),
    /// A field the summary needs was absent
    #[error("Missing field in provider response: {0}")]
    MissingField(&'static str),
    /// AQI level outside `1..=5`
    #[error("AQI level out of range: {0}")]
    AqiOutOfRange(i64),
}

/// A place resolved from a free-text query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Canonical place name, empty when the provider omits it
    pub name: String,
    /// Country code, empty when the provider omits it
    pub country: String,
}

/// Current conditions at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Ambient temperature in °C, as reported
    pub temperature_celsius: f64,
    /// Short condition text in the requested language
    pub description: String,
}

/// Air-quality index at a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirQualityReading {
    /// Raw AQI level; valid values are `1..=5`
    pub aqi_level: i64,
}

/// Interface for weather data providers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Resolve a free-text place name, returning at most `limit` matches
    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<GeocodeResult>, WeatherError>;

    /// Fetch current conditions in metric units and the given language
    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
        lang: LanguageCode,
    ) -> Result<WeatherReading, WeatherError>;

    /// Fetch the current air-quality index
    async fn air_quality(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AirQualityReading, WeatherError>;
}
