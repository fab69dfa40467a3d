//! Publish/subscribe hub behind the `/ws` endpoint.

mod hub;
mod subscription;

pub use hub::{EventHub, EventKind, ServerEvent};
pub use subscription::{ClientMessage, Subscription};
