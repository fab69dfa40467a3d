use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::websocket::handlers;
use crate::modules::events::EventHub;

/// Create the WebSocket route
pub fn routes(events: Arc<EventHub>) -> Router {
    Router::new()
        .route("/ws", get(handlers::ws_handler))
        .with_state(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::modules::events::EventKind;

    #[tokio::test]
    async fn test_room_events_reach_only_joined_clients() {
        let events = Arc::new(EventHub::new());
        let server = TestServer::builder()
            .http_transport()
            .build(routes(events.clone()))
            .unwrap();

        let joined = Uuid::new_v4();
        let other = Uuid::new_v4();

        let mut socket = server.get_websocket("/ws").await.into_websocket().await;
        socket
            .send_json(&json!({"type": "join_disaster", "disaster_id": joined}))
            .await;
        // Messages are handled in order, so the pong means the join has landed
        socket.send_json(&json!({"type": "ping"})).await;
        let pong: Value = socket.receive_json().await;
        assert_eq!(pong["type"], "pong");

        events.publish_to_room(EventKind::ReportCreated, other, &json!({"n": 1}));
        events.publish_to_room(EventKind::ReportCreated, joined, &json!({"n": 2}));
        events.publish_global(EventKind::DisasterUpdated, &json!({"n": 3}));

        let first: Value = socket.receive_json().await;
        assert_eq!(first["event"], "report_created");
        assert_eq!(first["data"]["n"], 2);

        let second: Value = socket.receive_json().await;
        assert_eq!(second["event"], "disaster_updated");
        assert!(second.get("room").is_none());
    }
}
