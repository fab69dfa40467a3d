use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::ai::ImageVerification;

/// Report verification status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "verification_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationStatus::Pending => write!(f, "pending"),
            VerificationStatus::Verified => write!(f, "verified"),
            VerificationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl VerificationStatus {
    pub fn from_verdict(authentic: bool) -> Self {
        if authentic {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Rejected
        }
    }
}

/// Database model for report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub disaster_id: Uuid,
    pub user_id: String,
    pub content: String,
    pub image_url: Option<String>,
    pub verification_status: VerificationStatus,
    /// Last AI verdict, if the report was ever verified
    pub verification: Option<Json<ImageVerification>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub disaster_id: Option<Uuid>,
    pub status: Option<VerificationStatus>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        self.disaster_id.map_or(true, |id| report.disaster_id == id)
            && self
                .status
                .map_or(true, |status| report.verification_status == status)
    }
}
