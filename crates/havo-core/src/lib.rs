#![deny(missing_docs)]
//! Havo core library.
//!
//! Localized weather and air-quality lookups, the user registry, and the
//! per-user language preferences shared by the bot transports.

/// Configuration management.
pub mod config;
/// Locale tables and language codes.
pub mod i18n;
/// User registry and language preference storage.
pub mod storage;
/// Utility functions.
pub mod utils;
/// Weather provider client and lookup pipeline.
pub mod weather;

/// Testing helpers and mocks.
#[cfg(test)]
pub mod testing;
