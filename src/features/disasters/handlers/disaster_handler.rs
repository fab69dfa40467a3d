use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, CurrentUser};
use crate::features::disasters::dtos::{
    CreateDisasterDto, DisasterListQuery, DisasterResponseDto, DisasterStatisticsDto,
    NearbyQuery, UpdateDisasterDto,
};
use crate::features::disasters::services::DisasterService;
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::{ApiResponse, Pagination, PaginationQuery};

/// List disasters
#[utoipa::path(
    get,
    path = "/api/disasters",
    params(DisasterListQuery),
    responses(
        (status = 200, description = "Paginated disasters", body = ApiResponse<Vec<DisasterResponseDto>>)
    ),
    tag = "disasters"
)]
pub async fn list_disasters(
    State(service): State<Arc<DisasterService>>,
    Query(query): Query<DisasterListQuery>,
) -> Result<Json<ApiResponse<Vec<DisasterResponseDto>>>> {
    let page = service.list(&query).await?;
    let pagination = Pagination::new(
        &PaginationQuery::new(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        ),
        page.total,
    );
    let dtos: Vec<DisasterResponseDto> = page.items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::paginated(dtos, pagination)))
}

/// Create a disaster
///
/// `location_name` is extracted from the description when omitted, and
/// coordinates are geocoded when not supplied.
#[utoipa::path(
    post,
    path = "/api/disasters",
    request_body = CreateDisasterDto,
    params(("X-User-Id" = Option<String>, Header, description = "Acting user")),
    responses(
        (status = 201, description = "Disaster created", body = ApiResponse<DisasterResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "disasters"
)]
pub async fn create_disaster(
    user: CurrentUser,
    State(service): State<Arc<DisasterService>>,
    AppJson(dto): AppJson<CreateDisasterDto>,
) -> Result<(StatusCode, Json<ApiResponse<DisasterResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let disaster = service.create(dto, &user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(disaster.into()),
            Some("Disaster created".to_string()),
        )),
    ))
}

/// Nearby disasters
#[utoipa::path(
    get,
    path = "/api/disasters/nearby",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Disasters within the radius", body = ApiResponse<Vec<DisasterResponseDto>>),
        (status = 400, description = "Invalid coordinates")
    ),
    tag = "disasters"
)]
pub async fn nearby_disasters(
    State(service): State<Arc<DisasterService>>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<Vec<DisasterResponseDto>>>> {
    let disasters = service.nearby(query.lat, query.lng, query.radius).await?;
    let dtos: Vec<DisasterResponseDto> = disasters.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None)))
}

/// Disaster statistics
#[utoipa::path(
    get,
    path = "/api/disasters/statistics",
    responses(
        (status = 200, description = "Aggregate counts", body = ApiResponse<DisasterStatisticsDto>)
    ),
    tag = "disasters"
)]
pub async fn disaster_statistics(
    State(service): State<Arc<DisasterService>>,
) -> Result<Json<ApiResponse<DisasterStatisticsDto>>> {
    let stats = service.statistics().await?;
    Ok(Json(ApiResponse::success(Some(stats), None)))
}

/// Get a disaster by id
#[utoipa::path(
    get,
    path = "/api/disasters/{id}",
    params(("id" = Uuid, Path, description = "Disaster ID")),
    responses(
        (status = 200, description = "Disaster details", body = ApiResponse<DisasterResponseDto>),
        (status = 404, description = "Disaster not found")
    ),
    tag = "disasters"
)]
pub async fn get_disaster(
    State(service): State<Arc<DisasterService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DisasterResponseDto>>> {
    let disaster = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(disaster.into()), None)))
}

/// Update a disaster
#[utoipa::path(
    put,
    path = "/api/disasters/{id}",
    params(
        ("id" = Uuid, Path, description = "Disaster ID"),
        ("X-User-Id" = Option<String>, Header, description = "Acting user")
    ),
    request_body = UpdateDisasterDto,
    responses(
        (status = 200, description = "Disaster updated", body = ApiResponse<DisasterResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Disaster not found")
    ),
    tag = "disasters"
)]
pub async fn update_disaster(
    user: CurrentUser,
    State(service): State<Arc<DisasterService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateDisasterDto>,
) -> Result<Json<ApiResponse<DisasterResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let disaster = service.update(id, dto, &user.id).await?;
    Ok(Json(ApiResponse::success(
        Some(disaster.into()),
        Some("Disaster updated".to_string()),
    )))
}

/// Delete a disaster and everything attached to it
#[utoipa::path(
    delete,
    path = "/api/disasters/{id}",
    params(("id" = Uuid, Path, description = "Disaster ID")),
    responses(
        (status = 200, description = "Disaster deleted"),
        (status = 404, description = "Disaster not found")
    ),
    tag = "disasters"
)]
pub async fn delete_disaster(
    State(service): State<Arc<DisasterService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Disaster deleted".to_string()),
    )))
}
