//! API key HTTP handlers.
//!
//! - GET /keys - Issue a key to the caller's address (or return its active one)
//! - GET /keys/mine - List every key ever issued to the caller's address
//!
//! Both endpoints identify the caller by the connection's peer address, the
//! same identity the access guard checks.

use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, State},
};
use chrono::{Duration, Utc};

use crate::{
    error::AppError,
    models::api_key::{ApiKeyResponse, IssuedKeyResponse},
    services::{access_guard::requester_identity, key_issuer::IssueOutcome},
    state::AppState,
};

/// Issue an API key.
///
/// # Endpoint
///
/// `GET /keys`
///
/// # Response
///
/// - **Success (200 OK)**: a new key, or the active one under the `reuse` policy
/// - **Error (400)**: an active key exists and the policy is `reject`
/// - **Error (500)**: the key could not be generated
/// - **Error (503)**: key store unavailable
///
/// ```json
/// {
///   "key": "9f86d081884c7d659a2feaa0c55ad015",
///   "expiresIn": "24 hours"
/// }
/// ```
pub async fn issue_key(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Result<Json<IssuedKeyResponse>, AppError> {
    let requester = requester_identity(&peer);

    let key = match state.issuer.issue(&requester, Utc::now()).await? {
        IssueOutcome::Created(key) | IssueOutcome::Reused(key) => key,
        IssueOutcome::Rejected => return Err(AppError::IssuanceRejected),
    };

    Ok(Json(IssuedKeyResponse {
        key: key.secret,
        expires_in: describe_ttl(state.issuer.ttl()),
    }))
}

/// List the caller's keys, expired ones included, in issuance order.
///
/// # Endpoint
///
/// `GET /keys/mine`
///
/// Not guarded: anyone sharing the caller's address sees the same list.
///
/// ```json
/// [
///   {
///     "id": 1,
///     "key": "9f86d081884c7d659a2feaa0c55ad015",
///     "ip": "203.0.113.7",
///     "expires_at": "2025-01-02T00:00:00Z"
///   }
/// ]
/// ```
pub async fn list_keys(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Result<Json<Vec<ApiKeyResponse>>, AppError> {
    let keys = state
        .keys
        .list_by_requester(&requester_identity(&peer))
        .await?;

    Ok(Json(keys.into_iter().map(Into::into).collect()))
}

/// Human-readable key lifetime, e.g. `"24 hours"`.
fn describe_ttl(ttl: Duration) -> String {
    match ttl.num_hours() {
        1 => "1 hour".to_string(),
        hours => format!("{hours} hours"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_is_described_in_hours() {
        assert_eq!(describe_ttl(Duration::hours(24)), "24 hours");
        assert_eq!(describe_ttl(Duration::hours(1)), "1 hour");
    }
}
