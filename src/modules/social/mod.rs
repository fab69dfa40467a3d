//! Federated social network adapter (Mastodon API) with keyword triage and
//! fixture fallback.

mod classify;
mod fixtures;
mod mastodon;
mod models;
mod service;

pub use classify::{classify_priority, strip_html};
pub use fixtures::fixture_posts;
pub use mastodon::{MastodonClient, SocialError};
pub use models::{Engagement, PostOrigin, SocialFeed, SocialMediaPost};
pub use service::{correlate, SocialService, DEFAULT_QUERY};
