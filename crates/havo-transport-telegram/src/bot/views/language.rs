//! Language picker shown on `/start`

use havo_core::i18n::LanguageCode;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Prefix of language picker callback data, followed by the code
pub const LANGUAGE_CALLBACK_PREFIX: &str = "lang_";

/// Prompt sent with the language keyboard
pub const LANGUAGE_PROMPT: &str = "🌍 Select a language / Tilni tanlang / Выберите язык:";

/// Callback data for one language button, e.g. `lang_uz`
#[must_use]
pub fn language_callback_data(lang: LanguageCode) -> String {
    format!("{LANGUAGE_CALLBACK_PREFIX}{}", lang.as_code())
}

/// Resolve picker callback data to a language.
///
/// Returns `None` for data that is not a language callback. Unknown codes
/// after the prefix resolve to English.
#[must_use]
pub fn parse_language_callback(data: &str) -> Option<LanguageCode> {
    data.strip_prefix(LANGUAGE_CALLBACK_PREFIX)
        .map(LanguageCode::from_code)
}

/// Inline keyboard with one row per supported language
///
/// # Examples
///
/// ```
/// use havo_transport_telegram::bot::views::language_keyboard;
/// let keyboard = language_keyboard();
/// assert_eq!(keyboard.inline_keyboard.len(), 3);
/// ```
#[must_use]
pub fn language_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(LanguageCode::ALL.into_iter().map(|lang| {
        vec![InlineKeyboardButton::callback(
            lang.locale().display_name,
            language_callback_data(lang),
        )]
    }))
}

/// Confirmation after a language was picked
#[must_use]
pub fn language_set(lang: LanguageCode) -> String {
    format!(
        "✅ Language set to: {}\n🌤 Type /weather <city> to get the weather.",
        lang.locale().display_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn test_keyboard_buttons() {
        let keyboard = language_keyboard();
        let buttons: Vec<(String, String)> = keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|button| match &button.kind {
                InlineKeyboardButtonKind::CallbackData(data) => {
                    Some((button.text.clone(), data.clone()))
                }
                _ => None,
            })
            .collect();

        assert_eq!(
            buttons,
            vec![
                ("English 🇬🇧".to_string(), "lang_en".to_string()),
                ("O'zbek 🇺🇿".to_string(), "lang_uz".to_string()),
                ("Русский 🇷🇺".to_string(), "lang_ru".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_callback() {
        assert_eq!(parse_language_callback("lang_ru"), Some(LanguageCode::Ru));
        assert_eq!(parse_language_callback("lang_xx"), Some(LanguageCode::En));
        assert_eq!(parse_language_callback("retry"), None);
    }

    #[test]
    fn test_language_set_text() {
        assert_eq!(
            language_set(LanguageCode::Uz),
            "✅ Language set to: O'zbek 🇺🇿\n🌤 Type /weather <city> to get the weather."
        );
    }
}
