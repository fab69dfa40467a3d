//! Real-time aggregation of disasters, reports, social media and public feeds.
//!
//! The poller aggregates on a fixed period and sends each snapshot over an
//! mpsc channel to the publisher, which broadcasts `realtime_update` to all
//! clients and `disaster_realtime_update` to each disaster room.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod workers;

pub use routes::RealtimeState;
pub use services::Aggregator;
pub use workers::{PollerState, RealtimePoller, SnapshotPublisher};
