//! Text and retry helpers shared by the provider client and the transports.

use anyhow::Result;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::warn;

/// Safely truncates a string to a maximum character length (not bytes).
///
/// This is UTF-8 safe and will not panic on multi-byte characters.
///
/// # Examples
///
/// ```
/// use havo_core::utils::truncate_str;
/// let s = "Привет, мир!";
/// assert_eq!(truncate_str(s, 6), "Привет");
/// ```
pub fn truncate_str(s: impl AsRef<str>, max_chars: usize) -> String {
    let s = s.as_ref();
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    s.char_indices()
        .nth(max_chars)
        .map_or_else(|| s.to_string(), |(pos, _)| s[..pos].to_string())
}

/// Retry a transport API operation with exponential backoff.
///
/// Used for outgoing chat messages, where a transient network error should
/// not drop the reply. Weather provider calls are never retried.
///
/// - Initial delay: 500ms
/// - Max delay: 4s
/// - Retries: 3 (see constants in `config.rs`)
///
/// # Errors
///
/// Returns the last error if every attempt fails.
///
/// # Examples
///
/// ```no_run
/// use havo_core::utils::retry_transport_operation;
/// use anyhow::Result;
///
/// async fn send() -> Result<()> {
///     Ok(())
/// }
///
/// # async fn example() -> Result<()> {
/// retry_transport_operation(|| async { send().await }).await?;
/// # Ok(())
/// # }
/// ```
pub async fn retry_transport_operation<F, Fut, T>(operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    retry_transport_operation_if(operation, |_: &anyhow::Error| true).await
}

/// Like [`retry_transport_operation`], but only retries errors for which
/// `should_retry` returns `true`. Other errors are returned immediately.
///
/// # Errors
///
/// Returns the first non-retryable error, or the last error if every attempt
/// fails.
pub async fn retry_transport_operation_if<F, Fut, T, C>(
    operation: F,
    should_retry: C,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
    C: FnMut(&anyhow::Error) -> bool,
{
    use crate::config::{
        TELEGRAM_API_INITIAL_BACKOFF_MS, TELEGRAM_API_MAX_BACKOFF_MS, TELEGRAM_API_MAX_RETRIES,
    };

    let retry_strategy = ExponentialBackoff::from_millis(TELEGRAM_API_INITIAL_BACKOFF_MS)
        .max_delay(Duration::from_millis(TELEGRAM_API_MAX_BACKOFF_MS))
        .map(jitter)
        .take(TELEGRAM_API_MAX_RETRIES);

    RetryIf::spawn(retry_strategy, operation, should_retry).await.map_err(|e| {
        warn!("Transport operation failed: {e}");
        e
    })
}
