use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use utoipa::ToSchema;
use uuid::Uuid;

/// Events pushed to connected clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    DisasterUpdated,
    ResourcesUpdated,
    ReportCreated,
    ReportVerified,
    ReportDeleted,
    SocialMediaUpdated,
    RealtimeUpdate,
    DisasterRealtimeUpdate,
}

/// One published event. `room` set means only that disaster's subscribers get it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServerEvent {
    pub event: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<Uuid>,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}

/// Fan-out of server events over a single broadcast channel
pub struct EventHub {
    tx: broadcast::Sender<Arc<ServerEvent>>,
}

impl EventHub {
    const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ServerEvent>> {
        self.tx.subscribe()
    }

    /// Number of connected subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publish an event; returns how many subscribers received it
    pub fn publish<T: Serialize>(&self, event: EventKind, room: Option<Uuid>, data: &T) -> usize {
        let data = match serde_json::to_value(data) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!("Failed to serialize {:?} event: {:?}", event, e);
                return 0;
            }
        };

        let message = Arc::new(ServerEvent {
            event,
            room,
            data,
            timestamp: Utc::now(),
        });

        // Err only means nobody is listening
        match self.tx.send(message) {
            Ok(n) => {
                tracing::debug!("Published {:?} (room: {:?}) to {} subscribers", event, room, n);
                n
            }
            Err(_) => 0,
        }
    }

    pub fn publish_global<T: Serialize>(&self, event: EventKind, data: &T) -> usize {
        self.publish(event, None, data)
    }

    pub fn publish_to_room<T: Serialize>(&self, event: EventKind, room: Uuid, data: &T) -> usize {
        self.publish(event, Some(room), data)
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let hub = EventHub::new();
        assert_eq!(hub.publish_global(EventKind::DisasterUpdated, &json!({})), 0);

        let mut rx = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 1);

        let room = Uuid::new_v4();
        hub.publish_to_room(EventKind::ReportCreated, room, &json!({"id": 1}));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event, EventKind::ReportCreated);
        assert_eq!(event.room, Some(room));
        assert_eq!(event.data["id"], 1);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_missed_events() {
        let hub = EventHub::with_capacity(2);
        let mut rx = hub.subscribe();
        for i in 0..5 {
            hub.publish_global(EventKind::RealtimeUpdate, &json!({ "n": i }));
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
        // Continues with the oldest retained event
        let next = rx.recv().await.unwrap();
        assert_eq!(next.data["n"], 3);
    }

    #[test]
    fn test_event_wire_format() {
        let event = ServerEvent {
            event: EventKind::DisasterRealtimeUpdate,
            room: None,
            data: json!([]),
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "disaster_realtime_update");
        assert!(value.get("room").is_none());
    }
}
