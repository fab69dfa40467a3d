use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::dtos::ReportResponseDto;
use crate::modules::ai::ImageVerification;

/// Request DTO for verifying an image
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VerifyImageDto {
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: String,

    /// What the image supposedly shows
    #[validate(length(max = 1000, message = "Context must not exceed 1000 characters"))]
    pub context: Option<String>,

    /// When set, the report's status is updated from the verdict
    pub report_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyImageResponseDto {
    pub image_url: String,
    pub verification: ImageVerification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportResponseDto>,
}
