//! Liveness and cache introspection.

pub mod dtos;
pub mod handlers;
pub mod routes;

pub use routes::HealthState;
