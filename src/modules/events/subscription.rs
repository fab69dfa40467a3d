use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hub::ServerEvent;

/// Messages a client may send over the socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    JoinDisaster { disaster_id: Uuid },
    LeaveDisaster { disaster_id: Uuid },
    Ping,
}

/// Rooms one connection has joined
#[derive(Debug, Default)]
pub struct Subscription {
    rooms: HashSet<Uuid>,
}

impl Subscription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, message: &ClientMessage) {
        match message {
            ClientMessage::JoinDisaster { disaster_id } => {
                self.rooms.insert(*disaster_id);
            }
            ClientMessage::LeaveDisaster { disaster_id } => {
                self.rooms.remove(disaster_id);
            }
            ClientMessage::Ping => {}
        }
    }

    /// Global events go to everyone, room events only to room members
    pub fn wants(&self, event: &ServerEvent) -> bool {
        match event.room {
            None => true,
            Some(room) => self.rooms.contains(&room),
        }
    }

    pub fn rooms(&self) -> &HashSet<Uuid> {
        &self.rooms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::events::EventKind;
    use chrono::Utc;
    use serde_json::json;

    fn event(room: Option<Uuid>) -> ServerEvent {
        ServerEvent {
            event: EventKind::ResourcesUpdated,
            room,
            data: json!({}),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_client_message_parsing() {
        let id = Uuid::new_v4();
        let raw = format!(r#"{{"type": "join_disaster", "disaster_id": "{}"}}"#, id);
        assert_eq!(
            serde_json::from_str::<ClientMessage>(&raw).unwrap(),
            ClientMessage::JoinDisaster { disaster_id: id }
        );
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type": "shout"}"#).is_err());
    }

    #[test]
    fn test_room_delivery() {
        let joined = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut sub = Subscription::new();

        assert!(sub.wants(&event(None)));
        assert!(!sub.wants(&event(Some(joined))));

        sub.apply(&ClientMessage::JoinDisaster { disaster_id: joined });
        assert!(sub.wants(&event(Some(joined))));
        assert!(!sub.wants(&event(Some(other))));

        sub.apply(&ClientMessage::LeaveDisaster { disaster_id: joined });
        assert!(!sub.wants(&event(Some(joined))));
        assert!(sub.rooms().is_empty());
    }
}
