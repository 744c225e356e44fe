//! API key guard middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Read the key from the `{key}` path segment
//! 2. Read the requester from the connection's peer address
//! 3. Run the access guard and reject with HTTP 401 on failure
//!
//! It must be installed with `route_layer` so path parameters are already
//! matched when it runs.

use std::{collections::HashMap, net::SocketAddr};

use axum::{
    RequestPartsExt,
    extract::{ConnectInfo, Path, Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::{
    error::AppError,
    services::access_guard::{self, requester_identity},
    state::AppState,
};

/// Name of the path parameter carrying the API key.
pub const KEY_PARAM: &str = "key";

/// API key guard middleware function.
///
/// # Flow
///
/// 1. Extract `{key}` from the matched route
/// 2. Take the requester identity from `ConnectInfo<SocketAddr>`
/// 3. Validate the pair against the key store
/// 4. If valid: call the next handler and return its response unchanged
/// 5. If not: return 401 Unauthorized
///
/// # Returns
///
/// - `Ok(Response)` from the inner handler
/// - `Err(AppError::InvalidApiKey)` if the key is missing, unknown, expired or
///   bound to another address
/// - `Err(AppError::StoreUnavailable)` if the key store failed
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();

    let secret = parts
        .extract::<Path<HashMap<String, String>>>()
        .await
        .ok()
        .and_then(|Path(mut params)| params.remove(KEY_PARAM));

    let requester = parts
        .extract::<ConnectInfo<SocketAddr>>()
        .await
        .ok()
        .map(|ConnectInfo(peer)| requester_identity(&peer));

    let request = Request::from_parts(parts, body);

    access_guard::guarded(
        &state.validator,
        secret.as_deref(),
        requester.as_deref(),
        Utc::now(),
        || next.run(request),
    )
    .await
}
