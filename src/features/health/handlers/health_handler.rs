use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, Json};
use chrono::Utc;

use crate::core::error::Result;
use crate::features::health::dtos::HealthResponseDto;
use crate::features::health::routes::HealthState;
use crate::modules::cache::CacheStats;
use crate::shared::types::ApiResponse;

const DB_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Service health and feature flags
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponseDto)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<Arc<HealthState>>) -> Json<HealthResponseDto> {
    let mut features = state.features;
    features.database = match &state.pool {
        Some(pool) => tokio::time::timeout(
            DB_PROBE_TIMEOUT,
            sqlx::query("SELECT 1").execute(pool),
        )
        .await
        .map(|r| r.is_ok())
        .unwrap_or(false),
        None => false,
    };

    Json(HealthResponseDto {
        status: "OK".to_string(),
        service: state.service.clone(),
        timestamp: Utc::now(),
        environment: state.environment.as_str().to_string(),
        features,
    })
}

/// Cache entry counts
#[utoipa::path(
    get,
    path = "/api/cache/stats",
    responses(
        (status = 200, description = "Cache statistics", body = ApiResponse<CacheStats>)
    ),
    tag = "system"
)]
pub async fn cache_stats(
    State(state): State<Arc<HealthState>>,
) -> Result<Json<ApiResponse<CacheStats>>> {
    let stats = state.cache.stats().await?;
    Ok(Json(ApiResponse::success(Some(stats), None)))
}
