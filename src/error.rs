//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::store::StoreError;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Validation**: missing, unknown or expired key, or a key presented from
///   another address. The caller is never told which one.
/// - **Issuance**: an active key already exists, or a key could not be created
/// - **Storage**: the key store or the catalog database failed
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// API key is missing, unknown, expired or bound to another address.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("invalid, expired key, or wrong source address")]
    InvalidApiKey,

    /// The address already holds an active key and the issuance policy
    /// forbids handing out another one.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("an active key already exists for this address")]
    IssuanceRejected,

    /// A key could not be generated (e.g. secret collision).
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("failed to generate key")]
    IssuanceFailed,

    /// The key store could not be reached or failed.
    ///
    /// Returns HTTP 503 Service Unavailable (hides details from client).
    #[error("{0}")]
    StoreUnavailable(String),

    /// Catalog query failed.
    ///
    /// Returns HTTP 500 Internal Server Error (hides details from client).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateSecret => AppError::IssuanceFailed,
            unavailable @ StoreError::Unavailable(_) => {
                AppError::StoreUnavailable(unavailable.to_string())
            }
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            AppError::IssuanceRejected => StatusCode::BAD_REQUEST,
            AppError::IssuanceFailed | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": "Human-readable error message"
/// }
/// ```
///
/// Storage errors are logged and replaced by a generic message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            AppError::StoreUnavailable(_) | AppError::Database(_) => {
                tracing::error!(error = %self, "request failed on storage");
                "An internal error occurred".to_string()
            }
            AppError::IssuanceFailed => {
                tracing::error!("key issuance failed");
                self.to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
