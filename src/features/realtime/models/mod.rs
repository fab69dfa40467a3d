mod snapshot;

pub use snapshot::{PollerStatus, RealtimeSnapshot, SourceSlice, SourceStatus};
