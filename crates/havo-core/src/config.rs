//! Configuration and settings management
//!
//! Loads settings from config files and environment variables and defines
//! the runtime constants shared by the transports.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Build the layered configuration source used by every settings struct.
///
/// Sources are merged in order: `config/default`, `config/{RUN_MODE}`,
/// `config/local`, `APP__*` variables, then plain environment variables.
///
/// # Errors
///
/// Returns a `ConfigError` if any present source cannot be parsed.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Local overrides, not checked into git
        .add_source(File::with_name("config/local").required(false))
        // Eg. `APP__USERS_FILE=/data/users.json` sets `users_file`
        .add_source(Environment::with_prefix("APP").separator("__"))
        // UPPER_SNAKE_CASE variables map to snake_case keys; empty values count as unset
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

/// Core settings consumed by the weather lookup and the user registry.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoreSettings {
    /// Weather provider API key (`WEATHER_API_KEY`)
    pub weather_api_key: String,

    /// Base URL of the OpenWeatherMap-compatible provider
    #[serde(default = "default_weather_api_base_url")]
    pub weather_api_base_url: String,

    /// Per-request timeout for provider calls, in seconds
    #[serde(default = "default_weather_http_timeout_secs")]
    pub weather_http_timeout_secs: u64,

    /// Path of the JSON file holding registered user IDs
    #[serde(default = "default_users_file")]
    pub users_file: String,
}

fn default_weather_api_base_url() -> String {
    DEFAULT_WEATHER_API_BASE_URL.to_string()
}

const fn default_weather_http_timeout_secs() -> u64 {
    DEFAULT_WEATHER_HTTP_TIMEOUT_SECS
}

fn default_users_file() -> String {
    DEFAULT_USERS_FILE.to_string()
}

impl CoreSettings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use havo_core::config::CoreSettings;
    ///
    /// let settings = CoreSettings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or the API key is blank.
    pub fn new() -> Result<Self, ConfigError> {
        let settings: Self = build_config()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Create settings with defaults for everything except the API key.
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            weather_api_key: api_key.into(),
            weather_api_base_url: default_weather_api_base_url(),
            weather_http_timeout_secs: default_weather_http_timeout_secs(),
            users_file: default_users_file(),
        }
    }

    /// Check values the deserializer cannot reject on its own.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` describing the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weather_api_key.trim().is_empty() {
            return Err(ConfigError::Message("WEATHER_API_KEY is missing".into()));
        }
        if !self.weather_api_base_url.starts_with("http://")
            && !self.weather_api_base_url.starts_with("https://")
        {
            return Err(ConfigError::Message(format!(
                "Weather API base URL must be an HTTP or HTTPS URL, got '{}'",
                self.weather_api_base_url
            )));
        }
        if self.weather_http_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "WEATHER_HTTP_TIMEOUT_SECS must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Provider request timeout as a `Duration`.
    #[must_use]
    pub const fn weather_http_timeout(&self) -> Duration {
        Duration::from_secs(self.weather_http_timeout_secs)
    }
}

/// Default OpenWeatherMap API root
pub const DEFAULT_WEATHER_API_BASE_URL: &str = "https://api.openweathermap.org";
/// Default provider request timeout in seconds
pub const DEFAULT_WEATHER_HTTP_TIMEOUT_SECS: u64 = 10;
/// Default location of the user registry
pub const DEFAULT_USERS_FILE: &str = "users.json";

/// Upper bound on remembered language preferences
pub const LANGUAGE_STORE_MAX_CAPACITY: u64 = 100_000;

// Telegram API retry configuration
/// Initial backoff before retrying a Telegram API call
pub const TELEGRAM_API_INITIAL_BACKOFF_MS: u64 = 500;
/// Maximum backoff between Telegram API retries
pub const TELEGRAM_API_MAX_BACKOFF_MS: u64 = 4000;
/// Number of retries after the first failed Telegram API call
pub const TELEGRAM_API_MAX_RETRIES: usize = 3;
