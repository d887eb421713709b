//! Resilient messaging utilities with automatic retry for Telegram API operations.
//!
//! Wraps sends in exponential backoff with jitter so a transient network
//! failure does not drop a broadcast. Errors reported by the Bot API itself
//! (blocked bot, deleted chat) are final and returned without retrying.

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Message};
use teloxide::RequestError;
use tracing::warn;

/// Whether a failed send is worth repeating.
///
/// `RequestError::Api` errors come from Telegram rejecting the request and
/// will not change on retry.
#[must_use]
pub fn is_transient_send_error(error: &anyhow::Error) -> bool {
    !matches!(
        error.downcast_ref::<RequestError>(),
        Some(RequestError::Api(_))
    )
}

/// Send a plain-text message with automatic retry on network failures.
///
/// Uses [`havo_core::utils::retry_transport_operation_if`] with exponential
/// backoff to handle transient network errors.
///
/// # Errors
///
/// Returns the Bot API error immediately, or the last network error after
/// all retries are exhausted.
pub async fn send_message_resilient(
    bot: &Bot,
    chat_id: ChatId,
    text: impl Into<String>,
) -> Result<Message> {
    let text = text.into();
    havo_core::utils::retry_transport_operation_if(
        || async {
            bot.send_message(chat_id, text.clone())
                .await
                .map_err(|e| anyhow::Error::new(e).context("Telegram send error"))
        },
        is_transient_send_error,
    )
    .await
}

/// Send `text` to every user in `user_ids`, one after another.
///
/// Returns how many sends succeeded. Failed sends are logged and skipped.
pub async fn broadcast_resilient(bot: &Bot, user_ids: &[i64], text: &str) -> usize {
    let mut delivered = 0;
    for &user_id in user_ids {
        match send_message_resilient(bot, ChatId(user_id), text).await {
            Ok(_) => delivered += 1,
            Err(e) => warn!("Broadcast to {user_id} failed: {e:#}"),
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::ApiError;

    #[test]
    fn test_api_errors_are_not_retried() {
        let blocked = anyhow::Error::new(RequestError::Api(ApiError::BotBlocked))
            .context("Telegram send error");
        assert!(!is_transient_send_error(&blocked));

        let network = anyhow::anyhow!("connection reset");
        assert!(is_transient_send_error(&network));
    }
}
