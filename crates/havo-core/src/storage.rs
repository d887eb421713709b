//! Storage layer for registered users and language preferences
//!
//! Users live in a flat JSON array on disk, rewritten on every change.
//! Language preferences are kept in memory only.

use crate::config::LANGUAGE_STORE_MAX_CAPACITY;
use crate::i18n::LanguageCode;
use async_trait::async_trait;
use moka::future::Cache;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error during JSON serialization or deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Interface for the registry of users who have talked to the bot
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Register a user, returning `true` if they were not known yet
    async fn register_user(&self, user_id: i64) -> Result<bool, StorageError>;
    /// All registered user IDs, in registration order
    async fn list_users(&self) -> Vec<i64>;
    /// Number of registered users
    async fn user_count(&self) -> usize;
}

/// User registry persisted as a JSON array of IDs
pub struct FileUserRegistry {
    path: PathBuf,
    users: RwLock<Vec<i64>>,
}

impl FileUserRegistry {
    /// Load the registry from `path`.
    ///
    /// A missing file yields an empty registry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be read or is not a JSON
    /// array of integers.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let users = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Vec<i64>>(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("User registry {} not found, starting empty", path.display());
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!("Loaded {} registered user(s) from {}", users.len(), path.display());
        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, users: &[i64]) -> Result<(), StorageError> {
        let body = serde_json::to_string_pretty(users)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for FileUserRegistry {
    async fn register_user(&self, user_id: i64) -> Result<bool, StorageError> {
        // Write lock is held through the file write so saves never interleave
        let mut users = self.users.write().await;
        if users.contains(&user_id) {
            return Ok(false);
        }

        users.push(user_id);
        if let Err(e) = self.persist(&users).await {
            // Forget the user so the next update retries the save
            users.pop();
            return Err(e);
        }

        debug!("Registered user {user_id}");
        Ok(true)
    }

    async fn list_users(&self) -> Vec<i64> {
        self.users.read().await.clone()
    }

    async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

/// Interface for per-user language preferences
#[async_trait]
pub trait LanguageStore: Send + Sync {
    /// Language the user picked, if any
    async fn get_language(&self, user_id: i64) -> Option<LanguageCode>;
    /// Remember the user's language
    async fn set_language(&self, user_id: i64, lang: LanguageCode);

    /// Language the user picked, or English when unset
    async fn language_or_default(&self, user_id: i64) -> LanguageCode {
        self.get_language(user_id).await.unwrap_or_default()
    }
}

/// Language preferences held in a bounded in-process cache
#[derive(Clone)]
pub struct InMemoryLanguageStore {
    cache: Cache<i64, LanguageCode>,
}

impl InMemoryLanguageStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(LANGUAGE_STORE_MAX_CAPACITY)
                .build(),
        }
    }
}

impl Default for InMemoryLanguageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageStore for InMemoryLanguageStore {
    async fn get_language(&self, user_id: i64) -> Option<LanguageCode> {
        self.cache.get(&user_id).await
    }

    async fn set_language(&self, user_id: i64, lang: LanguageCode) {
        if self.cache.contains_key(&user_id) {
            debug!("User {user_id} switched language to {lang}");
        }
        self.cache.insert(user_id, lang).await;
    }
}

/// Register a user, logging instead of failing.
///
/// Returns `true` if the user was new and saved.
pub async fn register_user_logged(store: &dyn UserStore, user_id: i64) -> bool {
    match store.register_user(user_id).await {
        Ok(added) => added,
        Err(e) => {
            warn!("Failed to persist user {user_id}: {e}");
            false
        }
    }
}
