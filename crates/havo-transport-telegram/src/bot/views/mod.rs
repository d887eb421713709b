//! View layer for bot UI components
//!
//! Contains keyboards, messages, and formatting for Telegram UI.

pub mod language;

pub use language::*;

/// Reply to `/weather` without a city
pub const WEATHER_USAGE: &str = "📍 Please provide a city name. Example: /weather Tashkent";
/// Sent while a weather lookup is in flight
pub const WEATHER_PENDING: &str = "⏳ Fetching weather...";
/// Reply to `/broadcast` from a non-admin
pub const BROADCAST_UNAUTHORIZED: &str = "❌ You are not authorized to send broadcasts.";
/// Reply to `/broadcast` without text
pub const BROADCAST_USAGE: &str = "📢 Provide a message. Example: /broadcast Hello everyone!";
/// Reply to `/usercount` from a non-admin
pub const USERCOUNT_UNAUTHORIZED: &str = "❌ You are not authorized to check user count.";

/// Broadcast confirmation for `count` registered users
#[must_use]
pub fn broadcast_sent(count: usize) -> String {
    format!("✅ Message sent to {count} users.")
}

/// Registered user total
#[must_use]
pub fn user_count(count: usize) -> String {
    format!("📊 Total users: {count}")
}

/// The caller's own Telegram ID
#[must_use]
pub fn my_id(user_id: i64) -> String {
    format!("🆔 Your Telegram ID: {user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_replies() {
        assert_eq!(broadcast_sent(3), "✅ Message sent to 3 users.");
        assert_eq!(user_count(0), "📊 Total users: 0");
        assert_eq!(my_id(123_456_789), "🆔 Your Telegram ID: 123456789");
    }
}
