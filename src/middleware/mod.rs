//! HTTP middleware components.

/// API key guard middleware
pub mod auth;
