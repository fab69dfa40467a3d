//! HTTP features, one directory per resource.

pub mod auth;
pub mod disasters;
pub mod fixtures;
pub mod geocode;
pub mod health;
pub mod official_updates;
pub mod rate_limits;
pub mod realtime;
pub mod reports;
pub mod resources;
pub mod social_media;
pub mod verification;
pub mod websocket;
