//! Key issuer - hands out at most one active key per source address.
//!
//! # Process
//!
//! 1. Look up the active key for the address
//! 2. If one exists, apply the issuance policy (reuse it or reject)
//! 3. Otherwise generate a secret and store it with an atomic
//!    "insert unless an active key exists" so racing requests for the same
//!    address cannot both create a key
//!
//! A request that loses that race sees the winner's key and goes through the
//! policy like any other request.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::{
    error::AppError,
    models::api_key::{ApiKey, NewApiKey},
    services::secret,
    store::{Insertion, KeyStore, StoreError},
};

/// What to do when an address asks for a key while it still holds one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssuancePolicy {
    /// Return the active key again.
    #[default]
    Reuse,
    /// Refuse to issue anything until the active key expires.
    Reject,
}

/// Result of an issuance request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    /// A new key was generated and stored.
    Created(ApiKey),
    /// The address already held this active key (policy `Reuse`).
    Reused(ApiKey),
    /// The address already holds an active key (policy `Reject`).
    Rejected,
}

impl IssueOutcome {
    /// The key handed to the caller, if any.
    pub fn key(&self) -> Option<&ApiKey> {
        match self {
            IssueOutcome::Created(key) | IssueOutcome::Reused(key) => Some(key),
            IssueOutcome::Rejected => None,
        }
    }
}

#[derive(Clone)]
pub struct KeyIssuer {
    store: Arc<dyn KeyStore>,
    policy: IssuancePolicy,
    ttl: Duration,
}

impl KeyIssuer {
    pub fn new(store: Arc<dyn KeyStore>, policy: IssuancePolicy, ttl: Duration) -> Self {
        Self { store, policy, ttl }
    }

    /// How long newly issued keys stay valid.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn policy(&self) -> IssuancePolicy {
        self.policy
    }

    /// Issue a key to `requester` at `now`.
    ///
    /// # Errors
    ///
    /// - `IssuanceFailed`: the generated secret collided with a stored one
    /// - `StoreUnavailable`: the key store failed
    pub async fn issue(&self, requester: &str, now: DateTime<Utc>) -> Result<IssueOutcome, AppError> {
        if let Some(existing) = self.store.find_active_key(requester, now).await? {
            return Ok(self.on_active_key(existing));
        }

        let key = NewApiKey {
            secret: secret::generate_secret(),
            requester: requester.to_string(),
            expires_at: now + self.ttl,
        };

        match self.store.insert_unless_active(key, now).await {
            Ok(Insertion::Inserted(stored)) => {
                tracing::info!(
                    id = stored.id,
                    requester,
                    fingerprint = %secret::fingerprint(&stored.secret),
                    expires_at = %stored.expires_at,
                    "issued api key"
                );
                Ok(IssueOutcome::Created(stored))
            }
            Ok(Insertion::ActiveExists(existing)) => {
                tracing::debug!(requester, "concurrent issuance already created a key");
                Ok(self.on_active_key(existing))
            }
            Err(StoreError::DuplicateSecret) => {
                tracing::error!(requester, "generated secret collided with a stored key");
                Err(AppError::IssuanceFailed)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn on_active_key(&self, existing: ApiKey) -> IssueOutcome {
        match self.policy {
            IssuancePolicy::Reuse => {
                tracing::debug!(id = existing.id, "returning active api key");
                IssueOutcome::Reused(existing)
            }
            IssuancePolicy::Reject => {
                tracing::info!(requester = %existing.requester, "rejected issuance, active key exists");
                IssueOutcome::Rejected
            }
        }
    }
}
