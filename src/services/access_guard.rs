//! Access guard - runs a protected operation only for a valid key.
//!
//! The requester is always the TCP peer address of the connection, the same
//! value used when the key was issued. Forwarding headers are ignored, so a
//! client cannot claim another address. Several clients behind one NAT or
//! proxy share an identity; that is a known limitation of address binding.

use std::{future::Future, net::SocketAddr};

use chrono::{DateTime, Utc};

use crate::{error::AppError, services::key_validator::KeyValidator};

/// Requester identity for a connection: the peer IP without the port.
///
/// IPv4-mapped IPv6 peers are reduced to their IPv4 form.
pub fn requester_identity(peer: &SocketAddr) -> String {
    peer.ip().to_canonical().to_string()
}

/// Check a presented secret for a requester.
///
/// Every failure (missing secret, unknown address, no match, expired) is the
/// same `InvalidApiKey` so the caller cannot tell which factor was wrong.
pub async fn authorize(
    validator: &KeyValidator,
    secret: Option<&str>,
    requester: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let (Some(secret), Some(requester)) = (secret, requester) else {
        return Err(AppError::InvalidApiKey);
    };

    if validator.validate(secret, requester, now).await? {
        Ok(())
    } else {
        tracing::debug!(requester, "rejected request with invalid api key");
        Err(AppError::InvalidApiKey)
    }
}

/// Run `op` if the secret is valid for the requester, and return its output
/// unchanged. `op` is never invoked otherwise.
pub async fn guarded<F, Fut, T>(
    validator: &KeyValidator,
    secret: Option<&str>,
    requester: Option<&str>,
    now: DateTime<Utc>,
    op: F,
) -> Result<T, AppError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    authorize(validator, secret, requester, now).await?;
    Ok(op().await)
}
