//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the cache, upstream API adapters and the event hub.

pub mod ai;
pub mod cache;
pub mod events;
pub mod feeds;
pub mod geocoding;
pub mod social;
