use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::{mpsc, RwLock};
use tokio::time::{interval, MissedTickBehavior};

use crate::features::realtime::models::{PollerStatus, RealtimeSnapshot};
use crate::features::realtime::services::Aggregator;

/// Shared between the poller task and the HTTP handlers
#[derive(Default)]
pub struct PollerState {
    running: AtomicBool,
    in_flight: AtomicBool,
    status: RwLock<PollerStatus>,
}

/// Held for the duration of one poll; releases the in-flight flag on drop
pub(crate) struct PollGuard<'a>(&'a AtomicBool);

impl Drop for PollGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl PollerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn try_begin(&self) -> Option<PollGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PollGuard(&self.in_flight))
    }

    pub fn is_polling(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn status(&self) -> PollerStatus {
        let mut status = self.status.read().await.clone();
        status.running = self.running.load(Ordering::Acquire);
        status.polling = self.is_polling();
        status
    }
}

/// Repeats aggregation on a fixed period and hands snapshots to the publisher
pub struct RealtimePoller {
    aggregator: Arc<Aggregator>,
    state: Arc<PollerState>,
    tx: mpsc::Sender<RealtimeSnapshot>,
    period: Duration,
}

impl RealtimePoller {
    pub fn new(
        aggregator: Arc<Aggregator>,
        state: Arc<PollerState>,
        tx: mpsc::Sender<RealtimeSnapshot>,
        period: Duration,
    ) -> Self {
        Self {
            aggregator,
            state,
            tx,
            period,
        }
    }

    /// Run the poller in a background loop
    pub async fn run(&self) {
        tracing::info!(
            "Starting realtime poller (every {}s)",
            self.period.as_secs()
        );
        self.state.running.store(true, Ordering::Release);
        self.state.status.write().await.poll_interval_secs = self.period.as_secs();

        let mut ticker = interval(self.period);
        // A slow poll delays the next tick instead of queueing a burst
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if self.tx.is_closed() {
                tracing::warn!("Snapshot publisher is gone, stopping realtime poller");
                break;
            }
            self.poll_once().await;
        }

        self.state.running.store(false, Ordering::Release);
    }

    /// One aggregation pass. Returns false when another poll is still running.
    pub async fn poll_once(&self) -> bool {
        let Some(_guard) = self.state.try_begin() else {
            tracing::debug!("Realtime poll already in flight, skipping");
            return false;
        };

        let started = Instant::now();
        let snapshot = self.aggregator.aggregate(None).await;
        let elapsed = started.elapsed();

        {
            let mut status = self.state.status.write().await;
            status.poll_count += 1;
            status.last_poll = Some(Utc::now());
            status.last_duration_ms = Some(elapsed.as_millis() as u64);
            status.sources = snapshot.sources.clone();
        }

        tracing::debug!(
            "Realtime poll finished in {}ms with {} items",
            elapsed.as_millis(),
            snapshot.item_count()
        );

        if self.tx.send(snapshot).await.is_err() {
            tracing::warn!("Snapshot publisher dropped, snapshot discarded");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::fixtures::FixtureStore;
    use crate::shared::test_helpers::{offline_aggregator, TestContext};

    fn poller(state: Arc<PollerState>) -> (RealtimePoller, mpsc::Receiver<RealtimeSnapshot>) {
        let ctx = TestContext::new();
        let aggregator = Arc::new(offline_aggregator(&ctx, Arc::new(FixtureStore::seeded())));
        let (tx, rx) = mpsc::channel(4);
        (
            RealtimePoller::new(aggregator, state, tx, Duration::from_secs(30)),
            rx,
        )
    }

    #[tokio::test]
    async fn test_poll_sends_snapshot_and_records_status() {
        let state = Arc::new(PollerState::new());
        let (poller, mut rx) = poller(state.clone());

        assert!(poller.poll_once().await);
        let snapshot = rx.recv().await.unwrap();
        assert!(!snapshot.disasters.is_empty());

        let status = state.status().await;
        assert_eq!(status.poll_count, 1);
        assert!(status.last_poll.is_some());
        assert!(!status.polling);
        assert_eq!(status.sources.len(), 6);
    }

    #[tokio::test]
    async fn test_no_overlapping_polls() {
        let state = Arc::new(PollerState::new());
        let (poller, mut rx) = poller(state.clone());

        let guard = state.try_begin().unwrap();
        assert!(state.is_polling());
        assert!(!poller.poll_once().await);
        assert!(rx.try_recv().is_err());

        drop(guard);
        assert!(poller.poll_once().await);
        assert_eq!(state.status().await.poll_count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_polls_run_one_at_a_time() {
        let state = Arc::new(PollerState::new());
        let (poller, _rx) = poller(state.clone());

        let (a, b) = tokio::join!(poller.poll_once(), poller.poll_once());
        // join! polls a first and a holds the flag across its first await
        assert!(a);
        assert!(!b);
    }
}
