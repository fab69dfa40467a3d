mod poller;
mod publisher;

pub use poller::{PollerState, RealtimePoller};
pub use publisher::SnapshotPublisher;
