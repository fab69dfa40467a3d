//! Key/value cache with per-entry expiry.
//!
//! Backed by the `cache` table in Postgres or by an in-memory map. The
//! [`CacheService`] facade never fails its callers: backend errors are logged
//! and treated as a miss.

mod memory;
mod postgres;
mod service;
mod store;
mod sweeper;

pub use memory::MemoryCacheStore;
pub use postgres::PgCacheStore;
pub use service::CacheService;
pub use store::{CacheStats, CacheStore};
pub use sweeper::CacheSweeper;
