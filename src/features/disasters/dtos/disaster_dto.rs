use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::disasters::models::{AuditEntry, Disaster};
use crate::shared::geo::Coordinates;

/// Response DTO for disaster
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DisasterResponseDto {
    pub id: Uuid,
    pub title: String,
    pub location_name: String,
    pub location: Option<Coordinates>,
    pub description: String,
    pub tags: Vec<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub audit_trail: Vec<AuditEntry>,
}

impl From<Disaster> for DisasterResponseDto {
    fn from(d: Disaster) -> Self {
        Self {
            location: d.coordinates(),
            id: d.id,
            title: d.title,
            location_name: d.location_name,
            description: d.description,
            tags: d.tags,
            owner_id: d.owner_id,
            created_at: d.created_at,
            updated_at: d.updated_at,
            audit_trail: d.audit_trail.0,
        }
    }
}

/// Request DTO for creating a disaster
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDisasterDto {
    #[validate(
        length(max = 200, message = "Title must not exceed 200 characters"),
        regex(
            path = "*crate::shared::validation::NOT_BLANK_REGEX",
            message = "Title is required"
        )
    )]
    #[serde(default)]
    pub title: String,

    /// Derived from the description when omitted
    #[validate(length(max = 255, message = "Location name must not exceed 255 characters"))]
    pub location_name: Option<String>,

    #[validate(
        length(max = 5000, message = "Description must not exceed 5000 characters"),
        regex(
            path = "*crate::shared::validation::NOT_BLANK_REGEX",
            message = "Description is required"
        )
    )]
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 tags"))]
    pub tags: Vec<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lng: Option<f64>,
}

/// Request DTO for updating a disaster; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDisasterDto {
    #[validate(
        length(max = 200, message = "Title must not exceed 200 characters"),
        regex(
            path = "*crate::shared::validation::NOT_BLANK_REGEX",
            message = "Title must not be blank"
        )
    )]
    pub title: Option<String>,

    #[validate(
        length(max = 255, message = "Location name must not exceed 255 characters"),
        regex(
            path = "*crate::shared::validation::NOT_BLANK_REGEX",
            message = "Location name must not be blank"
        )
    )]
    pub location_name: Option<String>,

    #[validate(
        length(max = 5000, message = "Description must not exceed 5000 characters"),
        regex(
            path = "*crate::shared::validation::NOT_BLANK_REGEX",
            message = "Description must not be blank"
        )
    )]
    pub description: Option<String>,

    #[validate(length(max = 20, message = "At most 20 tags"))]
    pub tags: Option<Vec<String>>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lng: Option<f64>,
}

/// Query parameters for listing disasters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DisasterListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Only disasters carrying this tag
    pub tag: Option<String>,
    pub owner_id: Option<String>,
    /// Substring match over title, description and location
    pub search: Option<String>,
}

/// Query parameters for the nearby search
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    /// Radius in metres (default 10000)
    pub radius: Option<f64>,
}

/// Aggregate counts over all disasters
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DisasterStatisticsDto {
    pub total: usize,
    pub with_coordinates: usize,
    pub created_last_24h: usize,
    pub by_tag: BTreeMap<String, usize>,
}
