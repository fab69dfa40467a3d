//! In-memory fixture store: the fallback datastore when Postgres is
//! unavailable, and the only store in `memory` mode.

mod seed;
mod store;

pub use store::FixtureStore;
