use std::sync::Arc;

use tokio::sync::mpsc;

use crate::features::realtime::models::RealtimeSnapshot;
use crate::modules::events::{EventHub, EventKind};

/// Receives snapshots from the poller and fans them out to subscribers
pub struct SnapshotPublisher {
    rx: mpsc::Receiver<RealtimeSnapshot>,
    events: Arc<EventHub>,
}

impl SnapshotPublisher {
    pub fn new(rx: mpsc::Receiver<RealtimeSnapshot>, events: Arc<EventHub>) -> Self {
        Self { rx, events }
    }

    pub async fn run(mut self) {
        tracing::info!("Starting realtime snapshot publisher");
        while let Some(snapshot) = self.rx.recv().await {
            self.publish(&snapshot);
        }
        tracing::info!("Realtime snapshot publisher stopped");
    }

    /// Full snapshot to everyone, then one scoped snapshot per disaster room
    pub fn publish(&self, snapshot: &RealtimeSnapshot) -> usize {
        if self.events.subscriber_count() == 0 {
            tracing::debug!("No subscribers, skipping realtime publish");
            return 0;
        }

        let mut delivered = self
            .events
            .publish_global(EventKind::RealtimeUpdate, snapshot);
        for disaster in &snapshot.disasters {
            let scoped = snapshot.scoped_to(disaster.id);
            delivered += self.events.publish_to_room(
                EventKind::DisasterRealtimeUpdate,
                disaster.id,
                &scoped,
            );
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::fixtures::FixtureStore;
    use crate::shared::test_helpers::{offline_aggregator, TestContext};

    #[tokio::test]
    async fn test_publishes_global_then_scoped_per_disaster() {
        let ctx = TestContext::new();
        let aggregator = offline_aggregator(&ctx, Arc::new(FixtureStore::seeded()));
        let snapshot = aggregator.aggregate(None).await;

        let (_tx, rx) = mpsc::channel(1);
        let publisher = SnapshotPublisher::new(rx, ctx.events.clone());
        let mut sub = ctx.events.subscribe();

        publisher.publish(&snapshot);

        let first = sub.try_recv().unwrap();
        assert_eq!(first.event, EventKind::RealtimeUpdate);
        assert!(first.room.is_none());

        for _ in 0..snapshot.disasters.len() {
            let event = sub.try_recv().unwrap();
            assert_eq!(event.event, EventKind::DisasterRealtimeUpdate);
            let room = event.room.unwrap();
            let scoped: RealtimeSnapshot = serde_json::from_value(event.data.clone()).unwrap();
            assert!(scoped.disasters.iter().all(|d| d.id == room));
            assert!(scoped.reports.iter().all(|r| r.disaster_id == room));
        }
        assert!(sub.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_skips_without_subscribers() {
        let ctx = TestContext::new();
        let (_tx, rx) = mpsc::channel(1);
        let publisher = SnapshotPublisher::new(rx, ctx.events.clone());
        let aggregator = offline_aggregator(&ctx, Arc::new(FixtureStore::seeded()));

        assert_eq!(publisher.publish(&aggregator.aggregate(None).await), 0);
    }
}
