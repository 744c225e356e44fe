//! Persistence of issued API keys.
//!
//! The [`KeyStore`] trait is the seam between the key services and storage.
//! [`PgKeyStore`] is used in production, [`InMemoryKeyStore`] for local runs
//! and tests.

mod memory;
mod postgres;

pub use memory::InMemoryKeyStore;
pub use postgres::PgKeyStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::api_key::{ApiKey, NewApiKey};

#[cfg(test)]
use mockall::automock;

/// Errors returned by a [`KeyStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The secret is already held by another stored key.
    #[error("secret already issued")]
    DuplicateSecret,

    /// The underlying storage could not be reached or failed the operation.
    #[error("key store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::DuplicateSecret,
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// Result of [`KeyStore::insert_unless_active`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// No active key existed, the new key was stored.
    Inserted(ApiKey),
    /// The requester already held this active key, nothing was written.
    ActiveExists(ApiKey),
}

/// Storage for [`ApiKey`] rows.
///
/// Rows are append-only: nothing here updates or deletes a key.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// The key held by `requester` that is still active at `now`, if any.
    async fn find_active_key(
        &self,
        requester: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ApiKey>, StoreError>;

    /// Store `key` unconditionally and return it with its assigned id.
    async fn insert(&self, key: NewApiKey) -> Result<ApiKey, StoreError>;

    /// Store `key` only if its requester holds no key active at `now`.
    ///
    /// The check and the write are atomic with respect to other calls for the
    /// same requester, so two racing calls never both insert.
    async fn insert_unless_active(
        &self,
        key: NewApiKey,
        now: DateTime<Utc>,
    ) -> Result<Insertion, StoreError>;

    /// Every key ever issued to `requester`, expired ones included, oldest first.
    async fn list_by_requester(&self, requester: &str) -> Result<Vec<ApiKey>, StoreError>;

    /// The key matching `secret` and `requester` that is still active at `now`.
    async fn find_for_validation(
        &self,
        secret: &str,
        requester: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ApiKey>, StoreError>;

    /// Check that the storage is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
