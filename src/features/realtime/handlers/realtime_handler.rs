use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::disasters::dtos::DisasterResponseDto;
use crate::features::realtime::dtos::{RealtimeQuery, RefreshResponseDto};
use crate::features::realtime::models::{PollerStatus, RealtimeSnapshot, SourceSlice};
use crate::features::realtime::routes::RealtimeState;
use crate::modules::feeds::{EmergencyAlert, Shelter, WeatherAlert};
use crate::modules::social::SocialMediaPost;
use crate::shared::types::ApiResponse;

/// Aggregate every source
#[utoipa::path(
    get,
    path = "/api/realtime/aggregate",
    params(RealtimeQuery),
    responses(
        (status = 200, description = "Correlated snapshot of all sources", body = ApiResponse<RealtimeSnapshot>)
    ),
    tag = "realtime"
)]
pub async fn aggregate(
    State(state): State<RealtimeState>,
    Query(query): Query<RealtimeQuery>,
) -> Result<Json<ApiResponse<RealtimeSnapshot>>> {
    let snapshot = state.aggregator.aggregate(query.disaster_id).await;
    Ok(Json(ApiResponse::success(Some(snapshot), None)))
}

/// Disasters as seen by the aggregator
#[utoipa::path(
    get,
    path = "/api/realtime/disasters",
    params(RealtimeQuery),
    responses(
        (status = 200, description = "Disasters", body = ApiResponse<SourceSlice<DisasterResponseDto>>)
    ),
    tag = "realtime"
)]
pub async fn realtime_disasters(
    State(state): State<RealtimeState>,
    Query(query): Query<RealtimeQuery>,
) -> Result<Json<ApiResponse<SourceSlice<DisasterResponseDto>>>> {
    let slice = state.aggregator.disasters(query.disaster_id).await;
    Ok(Json(ApiResponse::success(Some(slice), None)))
}

/// Live social media posts
#[utoipa::path(
    get,
    path = "/api/realtime/social-media",
    params(RealtimeQuery),
    responses(
        (status = 200, description = "Posts", body = ApiResponse<SourceSlice<SocialMediaPost>>)
    ),
    tag = "realtime"
)]
pub async fn realtime_social_media(
    State(state): State<RealtimeState>,
    Query(query): Query<RealtimeQuery>,
) -> Result<Json<ApiResponse<SourceSlice<SocialMediaPost>>>> {
    let slice = state.aggregator.social_media(query.disaster_id).await;
    Ok(Json(ApiResponse::success(Some(slice), None)))
}

/// Active weather alerts
#[utoipa::path(
    get,
    path = "/api/realtime/weather",
    params(RealtimeQuery),
    responses(
        (status = 200, description = "Weather alerts", body = ApiResponse<SourceSlice<WeatherAlert>>)
    ),
    tag = "realtime"
)]
pub async fn realtime_weather(
    State(state): State<RealtimeState>,
    Query(query): Query<RealtimeQuery>,
) -> Result<Json<ApiResponse<SourceSlice<WeatherAlert>>>> {
    let slice = state.aggregator.weather(query.disaster_id).await;
    Ok(Json(ApiResponse::success(Some(slice), None)))
}

/// Federal emergency declarations
#[utoipa::path(
    get,
    path = "/api/realtime/emergency-alerts",
    params(RealtimeQuery),
    responses(
        (status = 200, description = "Emergency declarations", body = ApiResponse<SourceSlice<EmergencyAlert>>)
    ),
    tag = "realtime"
)]
pub async fn realtime_emergency_alerts(
    State(state): State<RealtimeState>,
    Query(query): Query<RealtimeQuery>,
) -> Result<Json<ApiResponse<SourceSlice<EmergencyAlert>>>> {
    let slice = state.aggregator.emergency_alerts(query.disaster_id).await;
    Ok(Json(ApiResponse::success(Some(slice), None)))
}

/// Open shelters
#[utoipa::path(
    get,
    path = "/api/realtime/resources",
    params(RealtimeQuery),
    responses(
        (status = 200, description = "Open shelters", body = ApiResponse<SourceSlice<Shelter>>)
    ),
    tag = "realtime"
)]
pub async fn realtime_resources(
    State(state): State<RealtimeState>,
    Query(query): Query<RealtimeQuery>,
) -> Result<Json<ApiResponse<SourceSlice<Shelter>>>> {
    let slice = state.aggregator.shelters(query.disaster_id).await;
    Ok(Json(ApiResponse::success(Some(slice), None)))
}

/// Poller status
#[utoipa::path(
    get,
    path = "/api/realtime/status",
    responses(
        (status = 200, description = "Poller status", body = ApiResponse<PollerStatus>)
    ),
    tag = "realtime"
)]
pub async fn realtime_status(
    State(state): State<RealtimeState>,
) -> Result<Json<ApiResponse<PollerStatus>>> {
    let mut status = state.poller_state.status().await;
    status.subscribers = state.events.subscriber_count();
    Ok(Json(ApiResponse::success(Some(status), None)))
}

/// Run a poll now and publish the result
#[utoipa::path(
    post,
    path = "/api/realtime/refresh",
    responses(
        (status = 200, description = "Poll completed", body = ApiResponse<RefreshResponseDto>),
        (status = 400, description = "Realtime polling is disabled"),
        (status = 409, description = "A poll is already running")
    ),
    tag = "realtime"
)]
pub async fn refresh(
    State(state): State<RealtimeState>,
) -> Result<Json<ApiResponse<RefreshResponseDto>>> {
    let poller = state
        .poller
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("Realtime polling is disabled".to_string()))?;

    if !poller.poll_once().await {
        return Err(AppError::Conflict("A poll is already running".to_string()));
    }
    Ok(Json(ApiResponse::success(
        Some(RefreshResponseDto { started: true }),
        None,
    )))
}
