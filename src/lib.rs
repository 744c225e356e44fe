//! VaultMovies API - read-only movie and manga catalog behind time-limited,
//! address-bound API keys.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx, or in-memory stores
//! - **Authentication**: API key in the URL path, bound to the caller's IP
//! - **Format**: JSON responses, HTML documentation page

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
