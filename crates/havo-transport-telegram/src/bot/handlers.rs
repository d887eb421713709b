use crate::bot::resilient::broadcast_resilient;
use crate::bot::views;
use crate::config::BotSettings;
use anyhow::{anyhow, Result};
use havo_core::storage::{register_user_logged, LanguageStore, UserStore};
use havo_core::weather::{OpenWeatherClient, WeatherLookupService};
use std::sync::Arc;
use teloxide::{prelude::*, types::CallbackQuery, utils::command::BotCommands};
use teloxide::utils::command::ParseError;
use tracing::{info, warn};

/// Lookup service backed by OpenWeatherMap
pub type WeatherService = WeatherLookupService<OpenWeatherClient>;

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

// Whole argument string, trimmed; an absent argument parses as empty
#[allow(clippy::unnecessary_wraps)]
fn rest_of_line(input: String) -> Result<(String,), ParseError> {
    Ok((input.trim().to_string(),))
}

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Show the language picker
    #[command(description = "Choose a language.")]
    Start,
    /// Look up weather and air quality for a city
    #[command(description = "Weather for a city.", parse_with = rest_of_line)]
    Weather(String),
    /// Send a message to every registered user (admin only)
    #[command(description = "Message all users (admin).", parse_with = rest_of_line)]
    Broadcast(String),
    /// Show the registered user count (admin only)
    #[command(description = "Count users (admin).")]
    Usercount,
    /// Show the caller's Telegram ID
    #[command(description = "Show your Telegram ID.")]
    Myid,
}

/// City to look up, or `None` when the argument is blank.
#[must_use]
pub fn requested_city(arg: &str) -> Option<&str> {
    Some(arg.trim()).filter(|city| !city.is_empty())
}

/// Validate a broadcast request.
///
/// # Errors
///
/// Returns the reply to send instead when the sender is not the admin or the
/// text is blank.
pub fn broadcast_text(is_admin: bool, text: &str) -> Result<&str, &'static str> {
    if !is_admin {
        return Err(views::BROADCAST_UNAUTHORIZED);
    }
    Some(text.trim())
        .filter(|text| !text.is_empty())
        .ok_or(views::BROADCAST_USAGE)
}

/// Register the sender of any update before it is dispatched.
pub async fn register_sender(upd: Update, users: Arc<dyn UserStore>) {
    if let Some(user) = upd.from() {
        let user_id = user.id.0.cast_signed();
        if register_user_logged(users.as_ref(), user_id).await {
            info!("New user registered: {user_id}");
        }
    }
}

/// Start handler
///
/// # Errors
///
/// Returns an error if the language picker cannot be sent.
pub async fn start(bot: Bot, msg: Message) -> Result<()> {
    info!("User {} initiated /start command.", get_user_id_safe(&msg));

    bot.send_message(msg.chat.id, views::LANGUAGE_PROMPT)
        .reply_markup(views::language_keyboard())
        .await?;
    Ok(())
}

/// Language picker callback handler
///
/// # Errors
///
/// Returns an error if the confirmation cannot be sent.
pub async fn handle_language_callback(
    bot: Bot,
    q: CallbackQuery,
    languages: Arc<dyn LanguageStore>,
) -> Result<()> {
    let Some(lang) = q.data.as_deref().and_then(views::parse_language_callback) else {
        return Ok(());
    };

    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!("Failed to answer callback query: {e}");
    }

    let user_id = q.from.id.0.cast_signed();
    let chat_id = q
        .message
        .as_ref()
        .map(|msg| msg.chat().id)
        .ok_or_else(|| anyhow!("Callback message missing chat id"))?;

    languages.set_language(user_id, lang).await;
    info!("User {user_id} selected language {lang}");

    bot.send_message(chat_id, views::language_set(lang)).await?;
    Ok(())
}

/// Weather command handler
///
/// # Errors
///
/// Returns an error if a reply cannot be sent.
pub async fn weather(
    bot: Bot,
    msg: Message,
    city: String,
    service: Arc<WeatherService>,
    languages: Arc<dyn LanguageStore>,
) -> Result<()> {
    let Some(city) = requested_city(&city) else {
        bot.send_message(msg.chat.id, views::WEATHER_USAGE).await?;
        return Ok(());
    };

    let lang = languages.language_or_default(get_user_id_safe(&msg)).await;

    bot.send_message(msg.chat.id, views::WEATHER_PENDING).await?;

    let outcome = service.lookup(city, lang).await;
    bot.send_message(msg.chat.id, outcome.into_text()).await?;
    Ok(())
}

/// Broadcast command handler
///
/// # Errors
///
/// Returns an error if the reply to the admin cannot be sent.
pub async fn broadcast(
    bot: Bot,
    msg: Message,
    text: String,
    users: Arc<dyn UserStore>,
    settings: Arc<BotSettings>,
) -> Result<()> {
    let sender = get_user_id_safe(&msg);
    let text = match broadcast_text(settings.telegram.is_admin(sender), &text) {
        Ok(text) => text,
        Err(reply) => {
            if reply == views::BROADCAST_UNAUTHORIZED {
                warn!("User {sender} attempted a broadcast without admin rights");
            }
            bot.send_message(msg.chat.id, reply).await?;
            return Ok(());
        }
    };

    let recipients = users.list_users().await;
    let delivered = broadcast_resilient(&bot, &recipients, text).await;
    info!(
        "Broadcast delivered to {delivered} of {} users",
        recipients.len()
    );

    bot.send_message(msg.chat.id, views::broadcast_sent(recipients.len()))
        .await?;
    Ok(())
}

/// User count command handler
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn usercount(
    bot: Bot,
    msg: Message,
    users: Arc<dyn UserStore>,
    settings: Arc<BotSettings>,
) -> Result<()> {
    let reply = if settings.telegram.is_admin(get_user_id_safe(&msg)) {
        views::user_count(users.user_count().await)
    } else {
        views::USERCOUNT_UNAUTHORIZED.to_string()
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// My ID command handler
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn myid(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, views::my_id(get_user_id_safe(&msg)))
        .await?;
    Ok(())
}
