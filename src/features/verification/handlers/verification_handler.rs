use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::verification::dtos::{VerifyImageDto, VerifyImageResponseDto};
use crate::features::verification::routes::VerificationState;
use crate::shared::types::ApiResponse;

/// Verify an image's authenticity
///
/// Without a configured model the verdict falls back to the fail-open default
/// and `is_fallback` is set.
#[utoipa::path(
    post,
    path = "/api/verify/image",
    request_body = VerifyImageDto,
    responses(
        (status = 200, description = "Verification verdict", body = ApiResponse<VerifyImageResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Report not found")
    ),
    tag = "verification"
)]
pub async fn verify_image(
    State(state): State<VerificationState>,
    AppJson(dto): AppJson<VerifyImageDto>,
) -> Result<Json<ApiResponse<VerifyImageResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // Fail before the model call when the report doesn't exist
    if let Some(report_id) = dto.report_id {
        state.reports.get(report_id).await?;
    }

    let verification = state
        .ai
        .verify_image(&dto.image_url, dto.context.as_deref())
        .await;

    let report = match dto.report_id {
        Some(report_id) => Some(
            state
                .reports
                .apply_verification(report_id, &verification)
                .await?
                .into(),
        ),
        None => None,
    };

    Ok(Json(ApiResponse::success(
        Some(VerifyImageResponseDto {
            image_url: dto.image_url,
            verification,
            report,
        }),
        None,
    )))
}
