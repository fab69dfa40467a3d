use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::resources::dtos::{
    CreateResourceDto, ResourceListQuery, ResourceNearbyQuery, ResourceResponseDto,
    ResourceStatisticsDto, UpdateResourceDto,
};
use crate::features::resources::services::ResourceService;
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::{ApiResponse, Pagination, PaginationQuery};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ResourceStatisticsQuery {
    pub disaster_id: Option<Uuid>,
}

/// List resources
///
/// With `lat` and `lng`, results are limited to `radius` metres when backed by
/// the database.
#[utoipa::path(
    get,
    path = "/api/resources",
    params(ResourceListQuery),
    responses(
        (status = 200, description = "Paginated resources", body = ApiResponse<Vec<ResourceResponseDto>>),
        (status = 400, description = "Invalid coordinates")
    ),
    tag = "resources"
)]
pub async fn list_resources(
    State(service): State<Arc<ResourceService>>,
    Query(query): Query<ResourceListQuery>,
) -> Result<Json<ApiResponse<Vec<ResourceResponseDto>>>> {
    let page = service.list(&query).await?;
    let pagination = Pagination::new(
        &PaginationQuery::new(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        ),
        page.total,
    );
    let dtos: Vec<ResourceResponseDto> = page.items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::paginated(dtos, pagination)))
}

/// Add a resource
#[utoipa::path(
    post,
    path = "/api/resources",
    request_body = CreateResourceDto,
    responses(
        (status = 201, description = "Resource created", body = ApiResponse<ResourceResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Disaster not found")
    ),
    tag = "resources"
)]
pub async fn create_resource(
    State(service): State<Arc<ResourceService>>,
    AppJson(dto): AppJson<CreateResourceDto>,
) -> Result<(StatusCode, Json<ApiResponse<ResourceResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let resource = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(resource.into()),
            Some("Resource created".to_string()),
        )),
    ))
}

/// Resources near a point
#[utoipa::path(
    get,
    path = "/api/resources/nearby",
    params(ResourceNearbyQuery),
    responses(
        (status = 200, description = "Resources around the point", body = ApiResponse<Vec<ResourceResponseDto>>),
        (status = 400, description = "Invalid coordinates")
    ),
    tag = "resources"
)]
pub async fn nearby_resources(
    State(service): State<Arc<ResourceService>>,
    Query(query): Query<ResourceNearbyQuery>,
) -> Result<Json<ApiResponse<Vec<ResourceResponseDto>>>> {
    let resources = service.nearby(&query).await?;
    let dtos: Vec<ResourceResponseDto> = resources.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None)))
}

/// Resource statistics
#[utoipa::path(
    get,
    path = "/api/resources/statistics",
    params(ResourceStatisticsQuery),
    responses(
        (status = 200, description = "Counts by type", body = ApiResponse<ResourceStatisticsDto>)
    ),
    tag = "resources"
)]
pub async fn resource_statistics(
    State(service): State<Arc<ResourceService>>,
    Query(query): Query<ResourceStatisticsQuery>,
) -> Result<Json<ApiResponse<ResourceStatisticsDto>>> {
    let stats = service.statistics(query.disaster_id).await?;
    Ok(Json(ApiResponse::success(Some(stats), None)))
}

/// Get a resource by id
#[utoipa::path(
    get,
    path = "/api/resources/{id}",
    params(("id" = Uuid, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "Resource details", body = ApiResponse<ResourceResponseDto>),
        (status = 404, description = "Resource not found")
    ),
    tag = "resources"
)]
pub async fn get_resource(
    State(service): State<Arc<ResourceService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ResourceResponseDto>>> {
    let resource = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(resource.into()), None)))
}

/// Update a resource
#[utoipa::path(
    put,
    path = "/api/resources/{id}",
    params(("id" = Uuid, Path, description = "Resource ID")),
    request_body = UpdateResourceDto,
    responses(
        (status = 200, description = "Resource updated", body = ApiResponse<ResourceResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Resource not found")
    ),
    tag = "resources"
)]
pub async fn update_resource(
    State(service): State<Arc<ResourceService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateResourceDto>,
) -> Result<Json<ApiResponse<ResourceResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let resource = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(resource.into()),
        Some("Resource updated".to_string()),
    )))
}

/// Delete a resource
#[utoipa::path(
    delete,
    path = "/api/resources/{id}",
    params(("id" = Uuid, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "Resource deleted"),
        (status = 404, description = "Resource not found")
    ),
    tag = "resources"
)]
pub async fn delete_resource(
    State(service): State<Arc<ResourceService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Resource deleted".to_string()),
    )))
}
