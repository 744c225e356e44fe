//! Business logic services.
//!
//! Services contain the API key lifecycle separated from HTTP handlers.

pub mod access_guard;
pub mod key_issuer;
pub mod key_validator;
pub mod secret;
