//! Application configuration management.
//!
//! Configuration is read from environment variables with the `envy` crate,
//! after an optional `.env` file has been loaded.

use chrono::Duration;
use serde::Deserialize;

use crate::services::key_issuer::IssuancePolicy;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required unless `IN_MEMORY=true`)
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `ISSUANCE_POLICY` (optional): `reuse` or `reject`, defaults to `reuse`
/// - `KEY_TTL_HOURS` (optional): key lifetime in hours, defaults to 24
/// - `DB_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `IN_MEMORY` (optional): keep keys in memory and serve an empty catalog
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default)]
    pub issuance_policy: IssuancePolicy,

    #[serde(default = "default_key_ttl_hours")]
    pub key_ttl_hours: u32,

    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    #[serde(default)]
    pub in_memory: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] envy::Error),

    #[error("DATABASE_URL must be set unless IN_MEMORY=true")]
    MissingDatabaseUrl,

    #[error("KEY_TTL_HOURS must be greater than zero")]
    ZeroKeyTtl,
}

fn default_port() -> u16 {
    3000
}

fn default_key_ttl_hours() -> u32 {
    24
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Environment variable values cannot be parsed into expected types
    /// - `DATABASE_URL` is missing while a database is required
    /// - `KEY_TTL_HOURS` is zero
    pub fn from_env() -> Result<Self, ConfigError> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Build configuration from explicit key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.key_ttl_hours == 0 {
            return Err(ConfigError::ZeroKeyTtl);
        }
        if !self.in_memory && self.database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        Ok(())
    }

    pub fn key_ttl(&self) -> Duration {
        Duration::hours(i64::from(self.key_ttl_hours))
    }
}
