//! Telegram transport settings.

use config::ConfigError;
use havo_core::config::CoreSettings;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Telegram transport settings loaded from environment variables.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TelegramSettings {
    /// Telegram Bot API token (`BOT_TOKEN`).
    pub bot_token: String,
    /// Telegram user ID allowed to run admin commands (`ADMIN_ID`).
    #[serde(rename = "admin_id")]
    pub admin_id_str: Option<String>,
}

/// Combined settings used by the Telegram transport layer.
#[derive(Clone)]
pub struct BotSettings {
    /// Core settings shared across transport handlers.
    pub core: Arc<CoreSettings>,
    /// Telegram-specific settings.
    pub telegram: Arc<TelegramSettings>,
}

impl BotSettings {
    /// Create a new combined settings bundle.
    #[must_use]
    pub fn new(core: CoreSettings, telegram: TelegramSettings) -> Self {
        Self {
            core: Arc::new(core),
            telegram: Arc::new(telegram),
        }
    }
}

impl TelegramSettings {
    /// Create new settings by loading from environment and files.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or the bot token is blank.
    pub fn new() -> Result<Self, ConfigError> {
        let settings: Self = havo_core::config::build_config()?.try_deserialize()?;
        if settings.bot_token.trim().is_empty() {
            return Err(ConfigError::Message("BOT_TOKEN is missing".into()));
        }
        Ok(settings)
    }

    /// Admin user ID, if one is configured and numeric.
    #[must_use]
    pub fn admin_id(&self) -> Option<i64> {
        self.admin_id_str
            .as_deref()
            .map(str::trim)
            .and_then(|id| id.parse::<i64>().ok())
    }

    /// Whether `user_id` may run admin commands.
    ///
    /// Always `false` when no admin is configured.
    #[must_use]
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_id() == Some(user_id)
    }
}
