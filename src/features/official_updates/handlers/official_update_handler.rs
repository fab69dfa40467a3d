use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::official_updates::dtos::{OfficialUpdatesQuery, OfficialUpdatesResponseDto};
use crate::features::official_updates::services::OfficialUpdateService;
use crate::shared::types::ApiResponse;

/// Official updates from FEMA, the weather service and official accounts
#[utoipa::path(
    get,
    path = "/api/official-updates",
    params(OfficialUpdatesQuery),
    responses(
        (status = 200, description = "Updates, newest first", body = ApiResponse<OfficialUpdatesResponseDto>)
    ),
    tag = "official-updates"
)]
pub async fn list_official_updates(
    State(service): State<Arc<OfficialUpdateService>>,
    Query(query): Query<OfficialUpdatesQuery>,
) -> Result<Json<ApiResponse<OfficialUpdatesResponseDto>>> {
    let updates = service.list(query.disaster_id, query.limit()).await;
    Ok(Json(ApiResponse::success(
        Some(OfficialUpdatesResponseDto {
            total: updates.len(),
            updates,
        }),
        None,
    )))
}
