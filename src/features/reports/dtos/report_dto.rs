use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::{Report, VerificationStatus};
use crate::modules::ai::ImageVerification;

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub disaster_id: Uuid,
    pub user_id: String,
    pub content: String,
    pub image_url: Option<String>,
    pub verification_status: VerificationStatus,
    pub verification: Option<ImageVerification>,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            disaster_id: r.disaster_id,
            user_id: r.user_id,
            content: r.content,
            image_url: r.image_url,
            verification_status: r.verification_status,
            verification: r.verification.map(|v| v.0),
            created_at: r.created_at,
        }
    }
}

/// Request DTO for creating a report
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    pub disaster_id: Uuid,

    #[validate(
        length(max = 5000, message = "Content must not exceed 5000 characters"),
        regex(
            path = "*crate::shared::validation::NOT_BLANK_REGEX",
            message = "Content is required"
        )
    )]
    #[serde(default)]
    pub content: String,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Request DTO for editing a report
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateReportDto {
    #[validate(
        length(max = 5000, message = "Content must not exceed 5000 characters"),
        regex(
            path = "*crate::shared::validation::NOT_BLANK_REGEX",
            message = "Content must not be blank"
        )
    )]
    pub content: Option<String>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    /// Manual moderation override
    pub verification_status: Option<VerificationStatus>,
}

/// Optional reporter context for a verification run
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct VerifyReportDto {
    #[validate(length(max = 1000, message = "Context must not exceed 1000 characters"))]
    pub context: Option<String>,
}

/// Query parameters for listing reports
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ReportListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub disaster_id: Option<Uuid>,
    pub status: Option<VerificationStatus>,
}

/// Report counts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportStatisticsDto {
    pub total: usize,
    pub with_image: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_disaster: BTreeMap<Uuid, usize>,
}

/// Report plus the verdict that changed it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportVerificationDto {
    pub report: ReportResponseDto,
    pub verification: ImageVerification,
}
