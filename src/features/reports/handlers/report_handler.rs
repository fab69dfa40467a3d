use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, CurrentUser};
use crate::features::reports::dtos::{
    CreateReportDto, ReportListQuery, ReportResponseDto, ReportStatisticsDto,
    ReportVerificationDto, UpdateReportDto, VerifyReportDto,
};
use crate::features::reports::services::ReportService;
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::{ApiResponse, Pagination, PaginationQuery};

/// List reports
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Paginated reports", body = ApiResponse<Vec<ReportResponseDto>>)
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(service): State<Arc<ReportService>>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let page = service.list(&query).await?;
    let pagination = Pagination::new(
        &PaginationQuery::new(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        ),
        page.total,
    );
    let dtos: Vec<ReportResponseDto> = page.items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::paginated(dtos, pagination)))
}

/// File a report
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    params(("X-User-Id" = Option<String>, Header, description = "Acting user")),
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Disaster not found")
    ),
    tag = "reports"
)]
pub async fn create_report(
    user: CurrentUser,
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.create(dto, &user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report created".to_string()),
        )),
    ))
}

/// Report statistics
#[utoipa::path(
    get,
    path = "/api/reports/statistics",
    responses(
        (status = 200, description = "Counts by status and disaster", body = ApiResponse<ReportStatisticsDto>)
    ),
    tag = "reports"
)]
pub async fn report_statistics(
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<ReportStatisticsDto>>> {
    let stats = service.statistics().await?;
    Ok(Json(ApiResponse::success(Some(stats), None)))
}

/// Get a report by id
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report details", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None)))
}

/// Edit a report
#[utoipa::path(
    put,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = UpdateReportDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn update_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Report updated".to_string()),
    )))
}

/// Delete a report
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report deleted"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn delete_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Report deleted".to_string()),
    )))
}

/// Verify the report's image
///
/// The report becomes `verified` or `rejected` depending on the verdict.
#[utoipa::path(
    post,
    path = "/api/reports/{id}/verify",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = VerifyReportDto,
    responses(
        (status = 200, description = "Verification result", body = ApiResponse<ReportVerificationDto>),
        (status = 400, description = "Report has no image"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn verify_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ApiResponse<ReportVerificationDto>>> {
    // The body is optional
    let dto: VerifyReportDto = if body.is_empty() {
        VerifyReportDto::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON data: {}", e)))?
    };
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (report, verification) = service.verify(id, dto.context.as_deref()).await?;
    Ok(Json(ApiResponse::success(
        Some(ReportVerificationDto {
            report: report.into(),
            verification,
        }),
        None,
    )))
}
