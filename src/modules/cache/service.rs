use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::store::{CacheStats, CacheStore};
use crate::core::error::Result;

/// Best-effort cache facade shared by the adapters and the aggregator
pub struct CacheService {
    store: Arc<dyn CacheStore>,
}

impl CacheService {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        match self.store.get(key, Utc::now()).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Cache get failed for {}: {}", key, e);
                None
            }
        }
    }

    pub async fn set(&self, key: &str, value: Value, ttl: Duration) {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365));
        if let Err(e) = self.store.set(key, value, Utc::now() + ttl).await {
            tracing::warn!("Cache set failed for {}: {}", key, e);
        }
    }

    pub async fn delete(&self, key: &str) -> bool {
        match self.store.delete(key).await {
            Ok(existed) => existed,
            Err(e) => {
                tracing::warn!("Cache delete failed for {}: {}", key, e);
                false
            }
        }
    }

    /// Typed read; an entry that no longer matches `T` counts as a miss
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key).await?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Discarding malformed cache entry {}: {}", key, e);
                self.delete(key).await;
                None
            }
        }
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        match serde_json::to_value(value) {
            Ok(v) => self.set(key, v, ttl).await,
            Err(e) => tracing::warn!("Cache serialize failed for {}: {}", key, e),
        }
    }

    /// Remove expired entries; errors surface so the sweeper can log them
    pub async fn clear_expired(&self) -> Result<u64> {
        self.store.clear_expired(Utc::now()).await
    }

    pub async fn stats(&self) -> Result<CacheStats> {
        self.store.stats(Utc::now()).await
    }
}
