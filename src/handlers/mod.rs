//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (peer address, URL params, query string)
//! 2. Calls a service or repository
//! 3. Returns HTTP response (JSON or HTML, status code)

/// Movie and manga endpoints
pub mod catalog;
/// Documentation page
pub mod docs;
/// Health check endpoint
pub mod health;
/// API key issuance and listing endpoints
pub mod keys;
