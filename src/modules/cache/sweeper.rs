use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use super::CacheService;

/// Background task that periodically removes expired cache entries
pub struct CacheSweeper {
    cache: Arc<CacheService>,
    period: Duration,
}

impl CacheSweeper {
    pub fn new(cache: Arc<CacheService>, period: Duration) -> Self {
        Self { cache, period }
    }

    /// Run forever; a failed sweep is logged and retried on the next tick
    pub async fn run(self) {
        tracing::info!(
            "Starting cache sweeper (every {} seconds)",
            self.period.as_secs()
        );

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately; skip it so startup isn't slowed by a sweep
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.sweep_once().await;
        }
    }

    pub async fn sweep_once(&self) -> Option<u64> {
        match self.cache.clear_expired().await {
            Ok(removed) => {
                tracing::info!("Cache sweep removed {} expired entries", removed);
                Some(removed)
            }
            Err(e) => {
                tracing::error!("Cache sweep failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::cache::MemoryCacheStore;

    #[tokio::test]
    async fn test_sweep_once_reports_removed_count() {
        let cache = Arc::new(CacheService::new(Arc::new(MemoryCacheStore::new())));
        cache.set("a", serde_json::json!(1), Duration::ZERO).await;
        cache
            .set("b", serde_json::json!(2), Duration::from_secs(300))
            .await;

        let sweeper = CacheSweeper::new(Arc::clone(&cache), Duration::from_secs(3600));
        assert_eq!(sweeper.sweep_once().await, Some(1));
        assert!(cache.get("b").await.is_some());
    }
}
