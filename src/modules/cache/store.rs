use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::core::error::Result;

/// Entry counts at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CacheStats {
    pub total: i64,
    pub expired: i64,
}

/// Storage contract for cache entries.
///
/// An entry is expired once `expires_at <= now`. Callers pass `now`
/// explicitly so expiry is deterministic under test.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Return the live value for `key`; expired entries are deleted and reported as a miss
    async fn get(&self, key: &str, now: DateTime<Utc>) -> Result<Option<Value>>;

    /// Insert or overwrite `key`
    async fn set(&self, key: &str, value: Value, expires_at: DateTime<Utc>) -> Result<()>;

    /// Remove `key`, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Remove every expired entry, returning how many were removed
    async fn clear_expired(&self, now: DateTime<Utc>) -> Result<u64>;

    async fn stats(&self, now: DateTime<Utc>) -> Result<CacheStats>;
}
