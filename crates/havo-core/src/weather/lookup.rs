//! Localized lookup pipeline

use super::{AirQualityReading, GeocodeResult, WeatherError, WeatherProvider, WeatherReading};
use crate::i18n::LanguageCode;
use tracing::{debug, info, instrument, warn};

/// Reply sent for every provider-side failure
pub const PROVIDER_ERROR_MESSAGE: &str = "❌ Error fetching weather data. Try again later!";

/// Geocoding only ever needs the best match
const GEOCODE_LIMIT: u8 = 1;

/// Why a lookup did not produce a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Geocoding returned no matches
    CityNotFound,
    /// Network, status, payload or AQI range failure in any step
    ProviderError,
}

/// Result of one lookup, always carrying the text to show the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Composed weather and air-quality summary
    Success {
        /// Summary text
        text: String,
    },
    /// Lookup failed; `text` is the user-visible message
    Failure {
        /// Failure category
        kind: FailureKind,
        /// User-visible message
        text: String,
    },
}

impl LookupOutcome {
    /// Text to send back to the user.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success { text } | Self::Failure { text, .. } => text,
        }
    }

    /// Consume the outcome, returning its text.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Success { text } | Self::Failure { text, .. } => text,
        }
    }

    /// Whether a summary was composed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    fn provider_error() -> Self {
        Self::Failure {
            kind: FailureKind::ProviderError,
            text: PROVIDER_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Message for a query the geocoder could not resolve.
///
/// Not localized; it is the same for every language.
#[must_use]
pub fn city_not_found_message(city_query: &str) -> String {
    format!("❌ City not found: {city_query}")
}

/// Compose the four-line summary for one place.
///
/// # Errors
///
/// Returns `WeatherError::AqiOutOfRange` if the AQI level is outside `1..=5`.
pub fn compose_summary(
    place: &GeocodeResult,
    weather: &WeatherReading,
    air: AirQualityReading,
    lang: LanguageCode,
) -> Result<String, WeatherError> {
    let severity = lang
        .aqi_description(air.aqi_level)
        .ok_or(WeatherError::AqiOutOfRange(air.aqi_level))?;
    let locale = lang.locale();

    Ok(format!(
        "🌍 {}, {}\n🌡 {}: {}°C\n☁ {}\n💨 {}: {} (AQI: {})",
        place.name,
        place.country,
        locale.weather_label,
        weather.temperature_celsius,
        weather.description,
        locale.air_quality_label,
        severity,
        air.aqi_level
    ))
}

/// Chains geocoding, current weather and air quality into one reply.
///
/// Holds no mutable state; concurrent lookups are independent.
pub struct WeatherLookupService<P: WeatherProvider> {
    provider: P,
}

impl<P: WeatherProvider> WeatherLookupService<P> {
    /// Create a service over the given provider
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Underlying provider
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Look up weather and air quality for `city_query`.
    ///
    /// Never fails: every error becomes a [`LookupOutcome::Failure`] with a
    /// user-visible message, and the detail is logged.
    #[instrument(skip(self))]
    pub async fn lookup(&self, city_query: &str, lang: LanguageCode) -> LookupOutcome {
        match self.run_pipeline(city_query, lang).await {
            Ok(Some(text)) => {
                info!("Weather lookup for '{city_query}' succeeded");
                LookupOutcome::Success { text }
            }
            Ok(None) => {
                info!("City not found: '{city_query}'");
                LookupOutcome::Failure {
                    kind: FailureKind::CityNotFound,
                    text: city_not_found_message(city_query),
                }
            }
            Err(e) => {
                warn!("Weather lookup for '{city_query}' failed: {e}");
                LookupOutcome::provider_error()
            }
        }
    }

    // `Ok(None)` means the geocoder found nothing
    async fn run_pipeline(
        &self,
        city_query: &str,
        lang: LanguageCode,
    ) -> Result<Option<String>, WeatherError> {
        let matches = self.provider.geocode(city_query, GEOCODE_LIMIT).await?;
        let Some(place) = matches.into_iter().next() else {
            return Ok(None);
        };
        debug!(
            "Resolved '{city_query}' to {}, {} ({}, {})",
            place.name, place.country, place.latitude, place.longitude
        );

        let weather = self
            .provider
            .current_weather(place.latitude, place.longitude, lang)
            .await?;
        let air = self
            .provider
            .air_quality(place.latitude, place.longitude)
            .await?;

        compose_summary(&place, &weather, air, lang).map(Some)
    }
}
