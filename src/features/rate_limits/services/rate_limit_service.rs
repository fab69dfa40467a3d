use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::core::config::RateLimitConfig;

/// Buckets are swept for idle clients once every this many checks
const SWEEP_EVERY: u64 = 256;

/// Outcome of one admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: usize,
    pub remaining: usize,
    /// Time until the oldest counted request leaves the window
    pub reset_after: Duration,
}

/// Per-client rolling-window limiter.
///
/// Each client key keeps the instants of its admitted requests inside the
/// window; a request is admitted while fewer than `max_requests` remain.
pub struct RateLimiter {
    window: Duration,
    max_requests: usize,
    buckets: Mutex<HashMap<String, VecDeque<Instant>>>,
    checks: AtomicU64,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            window: config.window,
            max_requests: config.max_requests,
            buckets: Mutex::new(HashMap::new()),
            checks: AtomicU64::new(0),
        }
    }

    pub async fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now()).await
    }

    pub async fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut buckets = self.buckets.lock().await;

        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            let window = self.window;
            buckets.retain(|_, hits| {
                hits.back()
                    .is_some_and(|last| now.saturating_duration_since(*last) < window)
            });
        }

        let hits = buckets.entry(key.to_string()).or_default();
        while hits
            .front()
            .is_some_and(|first| now.saturating_duration_since(*first) >= self.window)
        {
            hits.pop_front();
        }

        let allowed = hits.len() < self.max_requests;
        if allowed {
            hits.push_back(now);
        }

        let reset_after = hits
            .front()
            .map(|first| self.window.saturating_sub(now.saturating_duration_since(*first)))
            .unwrap_or(self.window);

        RateDecision {
            allowed,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(hits.len()),
            reset_after,
        }
    }

    #[cfg(test)]
    pub async fn tracked_clients(&self) -> usize {
        self.buckets.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: usize, window_secs: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            window: Duration::from_secs(window_secs),
            max_requests,
        })
    }

    #[tokio::test]
    async fn test_rejects_request_over_limit() {
        let limiter = limiter(3, 60);
        let t0 = Instant::now();

        for i in 0..3 {
            let decision = limiter.check_at("10.0.0.1", t0).await;
            assert!(decision.allowed);
            assert_eq!(decision.remaining, 2 - i);
        }

        let denied = limiter.check_at("10.0.0.1", t0 + Duration::from_secs(1)).await;
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.reset_after, Duration::from_secs(59));

        // Other clients have their own budget
        assert!(limiter.check_at("10.0.0.2", t0).await.allowed);
    }

    #[tokio::test]
    async fn test_admits_again_after_window_slides() {
        let limiter = limiter(2, 60);
        let t0 = Instant::now();

        assert!(limiter.check_at("a", t0).await.allowed);
        assert!(limiter.check_at("a", t0 + Duration::from_secs(30)).await.allowed);
        assert!(!limiter.check_at("a", t0 + Duration::from_secs(59)).await.allowed);

        // First hit has left the window, second has not
        let later = t0 + Duration::from_secs(60);
        assert!(limiter.check_at("a", later).await.allowed);
        assert!(!limiter.check_at("a", later).await.allowed);
    }

    #[tokio::test]
    async fn test_denied_requests_do_not_extend_the_window() {
        let limiter = limiter(1, 10);
        let t0 = Instant::now();

        assert!(limiter.check_at("a", t0).await.allowed);
        for s in 1..10 {
            assert!(!limiter.check_at("a", t0 + Duration::from_secs(s)).await.allowed);
        }
        assert!(limiter.check_at("a", t0 + Duration::from_secs(10)).await.allowed);
    }

    #[tokio::test]
    async fn test_idle_clients_are_swept() {
        let limiter = limiter(5, 1);
        let t0 = Instant::now();

        for i in 0..10 {
            limiter.check_at(&format!("client-{}", i), t0).await;
        }
        assert_eq!(limiter.tracked_clients().await, 10);

        let later = t0 + Duration::from_secs(5);
        for _ in 0..SWEEP_EVERY {
            limiter.check_at("active", later).await;
        }
        assert_eq!(limiter.tracked_clients().await, 1);
    }
}
