//! API key model.
//!
//! An API key is a random secret issued to one source address for a limited
//! time. Keys are stored in plain text because the holder can list and
//! re-fetch them from the same address.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Represents an issued API key record from the database.
///
/// # Database Table
///
/// Maps to the `api_keys` table with columns:
/// - `id`: Sequential identifier assigned on insert
/// - `key`: The secret token (unique across every key ever issued)
/// - `ip`: Source address the key was issued to
/// - `expires_at`: Instant from which the key is no longer accepted
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ApiKey {
    /// Sequential identifier assigned by the store
    pub id: i64,

    /// The bearer secret (32 lowercase hex characters)
    #[sqlx(rename = "key")]
    pub secret: String,

    /// Source address this key is bound to
    #[sqlx(rename = "ip")]
    pub requester: String,

    /// The key is valid strictly before this instant
    pub expires_at: DateTime<Utc>,
}

impl ApiKey {
    /// Whether the key still grants access at `now`.
    ///
    /// A key whose `expires_at` equals `now` is already expired.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// A key that has not been persisted yet, so it has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApiKey {
    pub secret: String,
    pub requester: String,
    pub expires_at: DateTime<Utc>,
}

impl NewApiKey {
    pub fn into_stored(self, id: i64) -> ApiKey {
        ApiKey {
            id,
            secret: self.secret,
            requester: self.requester,
            expires_at: self.expires_at,
        }
    }
}

/// Response body for the key issuance endpoint.
///
/// # JSON Example
///
/// ```json
/// {
///   "key": "9f86d081884c7d659a2feaa0c55ad015",
///   "expiresIn": "24 hours"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct IssuedKeyResponse {
    pub key: String,

    #[serde(rename = "expiresIn")]
    pub expires_in: String,
}

/// One entry of the key listing endpoint.
///
/// Field names follow the stored columns rather than the Rust model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiKeyResponse {
    pub id: i64,
    pub key: String,
    pub ip: String,
    pub expires_at: DateTime<Utc>,
}

impl From<ApiKey> for ApiKeyResponse {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            key: key.secret,
            ip: key.requester,
            expires_at: key.expires_at,
        }
    }
}
