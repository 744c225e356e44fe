//! In-memory key store.
//!
//! Keeps every key in a vector behind one lock. Used when the service runs
//! without a database and by the test suite.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Insertion, KeyStore, StoreError};
use crate::models::api_key::{ApiKey, NewApiKey};

#[derive(Debug, Default)]
struct Rows {
    keys: Vec<ApiKey>,
    last_id: i64,
}

impl Rows {
    fn active_for(&self, requester: &str, now: DateTime<Utc>) -> Option<&ApiKey> {
        self.keys
            .iter()
            .find(|k| k.requester == requester && k.is_active_at(now))
    }

    fn push(&mut self, key: NewApiKey) -> Result<ApiKey, StoreError> {
        if self.keys.iter().any(|k| k.secret == key.secret) {
            return Err(StoreError::DuplicateSecret);
        }

        self.last_id += 1;
        let stored = key.into_stored(self.last_id);
        self.keys.push(stored.clone());
        Ok(stored)
    }
}

/// Key store kept in process memory. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryKeyStore {
    rows: RwLock<Rows>,
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("key store lock poisoned".to_string())
}

#[async_trait]
impl KeyStore for InMemoryKeyStore {
    async fn find_active_key(
        &self,
        requester: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ApiKey>, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.active_for(requester, now).cloned())
    }

    async fn insert(&self, key: NewApiKey) -> Result<ApiKey, StoreError> {
        self.rows.write().map_err(poisoned)?.push(key)
    }

    async fn insert_unless_active(
        &self,
        key: NewApiKey,
        now: DateTime<Utc>,
    ) -> Result<Insertion, StoreError> {
        let mut rows = self.rows.write().map_err(poisoned)?;

        if let Some(existing) = rows.active_for(&key.requester, now) {
            return Ok(Insertion::ActiveExists(existing.clone()));
        }

        rows.push(key).map(Insertion::Inserted)
    }

    async fn list_by_requester(&self, requester: &str) -> Result<Vec<ApiKey>, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows
            .keys
            .iter()
            .filter(|k| k.requester == requester)
            .cloned()
            .collect())
    }

    async fn find_for_validation(
        &self,
        secret: &str,
        requester: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ApiKey>, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows
            .keys
            .iter()
            .find(|k| k.secret == secret && k.requester == requester && k.is_active_at(now))
            .cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.rows.read().map(|_| ()).map_err(poisoned)
    }
}
