//! WebSocket delivery of server events with per-disaster rooms.

pub mod handlers;
pub mod routes;
