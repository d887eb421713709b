//! Language codes and the fixed locale tables
//!
//! Labels and air-quality severities for every supported language. The
//! tables are compiled in and never change at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages a user can pick for weather replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    /// English
    #[default]
    En,
    /// Uzbek
    Uz,
    /// Russian
    Ru,
}

/// Display strings for one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleStrings {
    /// Name shown on the language picker
    pub display_name: &'static str,
    /// Label in front of the temperature
    pub weather_label: &'static str,
    /// Label in front of the air-quality severity
    pub air_quality_label: &'static str,
}

const EN_LOCALE: LocaleStrings = LocaleStrings {
    display_name: "English 🇬🇧",
    weather_label: "Weather",
    air_quality_label: "Air Quality",
};

const UZ_LOCALE: LocaleStrings = LocaleStrings {
    display_name: "O'zbek 🇺🇿",
    weather_label: "Ob-havo",
    air_quality_label: "Havo sifati",
};

const RU_LOCALE: LocaleStrings = LocaleStrings {
    display_name: "Русский 🇷🇺",
    weather_label: "Погода",
    air_quality_label: "Качество воздуха",
};

/// Number of AQI levels reported by the provider
pub const AQI_LEVELS: usize = 5;

// Indexed by AQI level - 1
const EN_AQI: [&str; AQI_LEVELS] = ["Good 😊", "Fair 🙂", "Moderate 😐", "Poor 😷", "Very Poor 🤢"];
const UZ_AQI: [&str; AQI_LEVELS] = [
    "Yaxshi 😊",
    "Qoniqarli 🙂",
    "O'rtacha 😐",
    "Yomon 😷",
    "Juda yomon 🤢",
];
const RU_AQI: [&str; AQI_LEVELS] = [
    "Хороший 😊",
    "Удовлетворительный 🙂",
    "Умеренный 😐",
    "Плохой 😷",
    "Очень плохой 🤢",
];

impl LanguageCode {
    /// All supported languages, in picker order
    pub const ALL: [Self; 3] = [Self::En, Self::Uz, Self::Ru];

    /// Parse a language code. Unknown codes fall back to English.
    ///
    /// # Examples
    ///
    /// ```
    /// use havo_core::i18n::LanguageCode;
    ///
    /// assert_eq!(LanguageCode::from_code("uz"), LanguageCode::Uz);
    /// assert_eq!(LanguageCode::from_code("fr"), LanguageCode::En);
    /// ```
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        Self::parse(code).unwrap_or_default()
    }

    /// Parse a language code, returning `None` for unsupported codes.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "uz" => Some(Self::Uz),
            "ru" => Some(Self::Ru),
            _ => None,
        }
    }

    /// Two-letter code, also used as the provider's `lang` parameter
    #[must_use]
    pub const fn as_code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Uz => "uz",
            Self::Ru => "ru",
        }
    }

    /// Label strings for this language
    #[must_use]
    pub const fn locale(self) -> &'static LocaleStrings {
        match self {
            Self::En => &EN_LOCALE,
            Self::Uz => &UZ_LOCALE,
            Self::Ru => &RU_LOCALE,
        }
    }

    /// Severity label for an AQI level, or `None` outside `1..=5`.
    #[must_use]
    pub fn aqi_description(self, level: i64) -> Option<&'static str> {
        let table = match self {
            Self::En => &EN_AQI,
            Self::Uz => &UZ_AQI,
            Self::Ru => &RU_AQI,
        };
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        table.get(index).copied()
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!(LanguageCode::parse("en"), Some(LanguageCode::En));
        assert_eq!(LanguageCode::parse(" RU "), Some(LanguageCode::Ru));
        assert_eq!(LanguageCode::parse("fr"), None);
        assert_eq!(LanguageCode::from_code("fr"), LanguageCode::En);
        assert_eq!(LanguageCode::from_code(""), LanguageCode::En);
    }

    #[test]
    fn test_codes_round_trip_through_display() {
        for lang in LanguageCode::ALL {
            assert_eq!(LanguageCode::from_code(&lang.to_string()), lang);
        }
    }

    #[test]
    fn test_aqi_bounds() {
        assert_eq!(LanguageCode::En.aqi_description(1), Some("Good 😊"));
        assert_eq!(LanguageCode::Uz.aqi_description(2), Some("Qoniqarli 🙂"));
        assert_eq!(LanguageCode::Ru.aqi_description(5), Some("Очень плохой 🤢"));
        assert_eq!(LanguageCode::En.aqi_description(0), None);
        assert_eq!(LanguageCode::En.aqi_description(6), None);
        assert_eq!(LanguageCode::En.aqi_description(-3), None);
        assert_eq!(LanguageCode::En.aqi_description(i64::MIN), None);
    }

    #[test]
    fn test_locale_labels() {
        assert_eq!(LanguageCode::Uz.locale().weather_label, "Ob-havo");
        assert_eq!(LanguageCode::Ru.locale().air_quality_label, "Качество воздуха");
        assert_eq!(LanguageCode::En.locale().display_name, "English 🇬🇧");
    }
}
