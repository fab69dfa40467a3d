use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;

use crate::modules::events::{ClientMessage, EventHub, Subscription};

/// Subscribe to server events
///
/// Clients join disaster rooms with `{"type": "join_disaster", "disaster_id": "..."}`
/// and leave with `leave_disaster`. Global events reach every client; room
/// events only reach clients that joined that room.
#[utoipa::path(
    get,
    path = "/ws",
    responses(
        (status = 101, description = "Switching protocols to WebSocket")
    ),
    tag = "events"
)]
pub async fn ws_handler(ws: WebSocketUpgrade, State(events): State<Arc<EventHub>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, events))
}

async fn handle_socket(socket: WebSocket, events: Arc<EventHub>) {
    let mut rx = events.subscribe();
    let (mut sender, mut receiver) = socket.split();
    let mut subscription = Subscription::new();

    tracing::debug!("WebSocket client connected ({} subscribers)", events.subscriber_count());

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                let Some(Ok(message)) = incoming else { break };
                match message {
                    Message::Text(text) => {
                        match serde_json::from_str::<ClientMessage>(text.as_str()) {
                            Ok(ClientMessage::Ping) => {
                                let pong = json!({"type": "pong"}).to_string();
                                if sender.send(Message::Text(pong.into())).await.is_err() {
                                    break;
                                }
                            }
                            Ok(client_message) => {
                                subscription.apply(&client_message);
                                tracing::debug!("WebSocket rooms: {:?}", subscription.rooms());
                            }
                            Err(e) => {
                                tracing::debug!("Ignoring malformed client message: {}", e);
                            }
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            event = rx.recv() => {
                match event {
                    Ok(event) => {
                        if !subscription.wants(&event) {
                            continue;
                        }
                        let payload = match serde_json::to_string(event.as_ref()) {
                            Ok(p) => p,
                            Err(e) => {
                                tracing::error!("Failed to serialize event: {:?}", e);
                                continue;
                            }
                        };
                        if sender.send(Message::Text(payload.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("WebSocket client lagging, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("WebSocket client disconnected");
}
