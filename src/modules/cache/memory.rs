use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use super::store::{CacheStats, CacheStore};
use crate::core::error::Result;

struct Entry {
    value: Value,
    expires_at: DateTime<Utc>,
}

/// Process-local cache used in memory mode and in tests
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str, now: DateTime<Utc>) -> Result<Option<Value>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // Expired: delete lazily, re-checking in case a writer refreshed it meanwhile
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if entry.expires_at > now {
                return Ok(Some(entry.value.clone()));
            }
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Value, expires_at: DateTime<Utc>) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn clear_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        Ok((before - entries.len()) as u64)
    }

    async fn stats(&self, now: DateTime<Utc>) -> Result<CacheStats> {
        let entries = self.entries.read().await;
        let expired = entries.values().filter(|e| e.expires_at <= now).count();
        Ok(CacheStats {
            total: entries.len() as i64,
            expired: expired as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_returns_value_until_expiry() {
        let store = MemoryCacheStore::new();
        let t0 = Utc::now();
        store
            .set("k", json!({"v": 1}), t0 + Duration::seconds(30))
            .await
            .unwrap();

        assert_eq!(store.get("k", t0).await.unwrap(), Some(json!({"v": 1})));
        assert_eq!(
            store.get("k", t0 + Duration::seconds(29)).await.unwrap(),
            Some(json!({"v": 1}))
        );
        assert_eq!(store.get("k", t0 + Duration::seconds(30)).await.unwrap(), None);
        // Once expired the entry is gone, even for an earlier clock reading
        assert_eq!(store.get("k", t0).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryCacheStore::new();
        let t0 = Utc::now();
        store.set("k", json!(1), t0 + Duration::seconds(5)).await.unwrap();
        store.set("k", json!(2), t0 + Duration::seconds(60)).await.unwrap();

        assert_eq!(
            store.get("k", t0 + Duration::seconds(10)).await.unwrap(),
            Some(json!(2))
        );
    }

    #[tokio::test]
    async fn test_clear_expired_removes_only_expired() {
        let store = MemoryCacheStore::new();
        let t0 = Utc::now();
        store.set("old1", json!(1), t0 - Duration::seconds(10)).await.unwrap();
        store.set("old2", json!(2), t0).await.unwrap();
        store.set("live", json!(3), t0 + Duration::seconds(10)).await.unwrap();

        assert_eq!(
            store.stats(t0).await.unwrap(),
            CacheStats {
                total: 3,
                expired: 2
            }
        );

        let removed = store.clear_expired(t0).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.get("live", t0).await.unwrap(), Some(json!(3)));
        assert_eq!(
            store.stats(t0).await.unwrap(),
            CacheStats {
                total: 1,
                expired: 0
            }
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryCacheStore::new();
        let t0 = Utc::now();
        store.set("k", json!(1), t0 + Duration::seconds(5)).await.unwrap();
        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
        assert_eq!(store.get("k", t0).await.unwrap(), None);
    }
}
