//! Testing helpers and mock utilities.
//!
//! Provides fixtures and preconfigured weather provider mocks.

use crate::i18n::LanguageCode;
use crate::weather::{AirQualityReading, GeocodeResult, MockWeatherProvider, WeatherReading};
use mockall::predicate::eq;

/// Geocoding result for Tashkent, Uzbekistan.
#[must_use]
pub fn tashkent() -> GeocodeResult {
    GeocodeResult {
        latitude: 41.3111,
        longitude: 69.2797,
        name: "Tashkent".to_string(),
        country: "UZ".to_string(),
    }
}

/// Create a mock provider answering one Tashkent lookup.
///
/// Reports 22.5°C with a clear sky (`"ochiq"`) and the given AQI level.
/// Expects exactly one call per step, with `lang` passed to the weather call.
#[must_use]
pub fn tashkent_provider(lang: LanguageCode, aqi_level: i64) -> MockWeatherProvider {
    let place = tashkent();
    let (lat, lon) = (place.latitude, place.longitude);

    let mut mock = MockWeatherProvider::new();
    mock.expect_geocode()
        .with(eq("Tashkent"), eq(1u8))
        .times(1)
        .returning(move |_, _| Ok(vec![place.clone()]));
    mock.expect_current_weather()
        .with(eq(lat), eq(lon), eq(lang))
        .times(1)
        .returning(|_, _, _| {
            Ok(WeatherReading {
                temperature_celsius: 22.5,
                description: "ochiq".to_string(),
            })
        });
    mock.expect_air_quality()
        .with(eq(lat), eq(lon))
        .times(1)
        .returning(move |_, _| Ok(AirQualityReading { aqi_level }));
    mock
}
