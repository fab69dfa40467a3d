//! Per-IP request budget applied to everything under `/api`.

pub mod middleware;
pub mod services;

pub use middleware::rate_limit_middleware;
pub use services::RateLimiter;
