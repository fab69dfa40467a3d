use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use super::store::{CacheStats, CacheStore};
use crate::core::error::{AppError, Result};

/// Cache entries in the `cache` table
pub struct PgCacheStore {
    pool: PgPool,
}

impl PgCacheStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CacheStore for PgCacheStore {
    async fn get(&self, key: &str, now: DateTime<Utc>) -> Result<Option<Value>> {
        let row = sqlx::query_as::<_, (Value, DateTime<Utc>)>(
            "SELECT value, expires_at FROM cache WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::debug!("Cache read failed for {}: {:?}", key, e);
            AppError::Database(e)
        })?;

        match row {
            Some((value, expires_at)) if expires_at > now => Ok(Some(value)),
            Some(_) => {
                sqlx::query("DELETE FROM cache WHERE key = $1 AND expires_at <= $2")
                    .bind(key)
                    .bind(now)
                    .execute(&self.pool)
                    .await?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value, expires_at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cache (key, value, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value, expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cache WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM cache WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn stats(&self, now: DateTime<Utc>) -> Result<CacheStats> {
        let (total, expired) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE expires_at <= $1)
            FROM cache
            "#,
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(CacheStats { total, expired })
    }
}
