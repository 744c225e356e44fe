//! PostgreSQL-backed key store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Insertion, KeyStore, StoreError};
use crate::{
    db::DbPool,
    models::api_key::{ApiKey, NewApiKey},
};

/// Key store over the `api_keys` table.
#[derive(Debug, Clone)]
pub struct PgKeyStore {
    pool: DbPool,
}

impl PgKeyStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyStore for PgKeyStore {
    async fn find_active_key(
        &self,
        requester: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ApiKey>, StoreError> {
        let key = sqlx::query_as::<_, ApiKey>(
            "SELECT id, key, ip, expires_at FROM api_keys WHERE ip = $1 AND expires_at > $2",
        )
        .bind(requester)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(key)
    }

    async fn insert(&self, key: NewApiKey) -> Result<ApiKey, StoreError> {
        let stored = sqlx::query_as::<_, ApiKey>(
            r#"
            INSERT INTO api_keys (key, ip, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, key, ip, expires_at
            "#,
        )
        .bind(&key.secret)
        .bind(&key.requester)
        .bind(key.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn insert_unless_active(
        &self,
        key: NewApiKey,
        now: DateTime<Utc>,
    ) -> Result<Insertion, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Serializes issuance per address until commit or rollback
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&key.requester)
            .execute(&mut *tx)
            .await?;

        let active = sqlx::query_as::<_, ApiKey>(
            "SELECT id, key, ip, expires_at FROM api_keys WHERE ip = $1 AND expires_at > $2",
        )
        .bind(&key.requester)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(existing) = active {
            tx.rollback().await?;
            return Ok(Insertion::ActiveExists(existing));
        }

        let stored = sqlx::query_as::<_, ApiKey>(
            r#"
            INSERT INTO api_keys (key, ip, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, key, ip, expires_at
            "#,
        )
        .bind(&key.secret)
        .bind(&key.requester)
        .bind(key.expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Insertion::Inserted(stored))
    }

    async fn list_by_requester(&self, requester: &str) -> Result<Vec<ApiKey>, StoreError> {
        let keys = sqlx::query_as::<_, ApiKey>(
            "SELECT id, key, ip, expires_at FROM api_keys WHERE ip = $1 ORDER BY id",
        )
        .bind(requester)
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }

    async fn find_for_validation(
        &self,
        secret: &str,
        requester: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ApiKey>, StoreError> {
        let key = sqlx::query_as::<_, ApiKey>(
            r#"
            SELECT id, key, ip, expires_at
            FROM api_keys
            WHERE key = $1 AND ip = $2 AND expires_at > $3
            "#,
        )
        .bind(secret)
        .bind(requester)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(key)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
