//! Key validation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::store::{KeyStore, StoreError};

/// Answers whether a presented secret grants access to a requester.
#[derive(Clone)]
pub struct KeyValidator {
    store: Arc<dyn KeyStore>,
}

impl KeyValidator {
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self { store }
    }

    /// True iff a stored key matches `secret` and `requester` and is still
    /// active at `now`. Read only.
    pub async fn validate(
        &self,
        secret: &str,
        requester: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        if secret.is_empty() || requester.is_empty() {
            return Ok(false);
        }

        let found = self
            .store
            .find_for_validation(secret, requester, now)
            .await?;

        Ok(found.is_some())
    }
}
