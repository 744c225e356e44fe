//! Database connection pool and schema management.
//!
//! This module provides utilities for:
//! - Creating and managing a PostgreSQL connection pool
//! - Running additive migrations at startup
//! - Resetting the key table, only on explicit operator request

use sqlx::{Pool, Postgres};

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection string is invalid
/// - Cannot connect to PostgreSQL server
/// - Database authentication fails
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Migrations only create missing tables and indexes; existing keys and
/// catalog rows are left untouched.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro reads migrations at compile time from ./migrations directory
    sqlx::migrate!("./migrations").run(pool).await
}

/// Delete every issued key and restart id numbering.
///
/// Destroys all key history. Only the `reset-keys` command calls this.
pub async fn reset_api_keys(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("TRUNCATE TABLE api_keys RESTART IDENTITY")
        .execute(pool)
        .await?;
    Ok(())
}
