//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the response bodies built from them.

/// API key model
pub mod api_key;
/// Manga and chapter models
pub mod manga;
/// Movie model
pub mod movie;
