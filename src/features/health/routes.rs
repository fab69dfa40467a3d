use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::PgPool;

use crate::core::config::Environment;
use crate::features::health::dtos::FeatureFlagsDto;
use crate::features::health::handlers;
use crate::modules::cache::CacheService;

pub struct HealthState {
    pub service: String,
    pub environment: Environment,
    pub features: FeatureFlagsDto,
    /// Probed on each health check when present
    pub pool: Option<PgPool>,
    pub cache: Arc<CacheService>,
}

/// `/health` sits outside `/api` so it is never rate limited
pub fn health_routes(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

pub fn cache_routes(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/api/cache/stats", get(handlers::cache_stats))
        .with_state(state)
}
