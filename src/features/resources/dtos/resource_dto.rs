use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::resources::models::{Resource, ResourceType};
use crate::shared::geo::Coordinates;

/// Response DTO for resource
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResourceResponseDto {
    pub id: Uuid,
    pub disaster_id: Uuid,
    pub name: String,
    pub location_name: String,
    pub location: Option<Coordinates>,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub capacity: Option<i32>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Resource> for ResourceResponseDto {
    fn from(r: Resource) -> Self {
        Self {
            location: r.coordinates(),
            id: r.id,
            disaster_id: r.disaster_id,
            name: r.name,
            location_name: r.location_name,
            resource_type: r.resource_type,
            capacity: r.capacity,
            available: r.available,
            created_at: r.created_at,
        }
    }
}

/// Request DTO for creating a resource
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateResourceDto {
    pub disaster_id: Uuid,

    #[validate(
        length(max = 200, message = "Name must not exceed 200 characters"),
        regex(
            path = "*crate::shared::validation::NOT_BLANK_REGEX",
            message = "Name is required"
        )
    )]
    #[serde(default)]
    pub name: String,

    #[validate(
        length(max = 255, message = "Location name must not exceed 255 characters"),
        regex(
            path = "*crate::shared::validation::NOT_BLANK_REGEX",
            message = "Location name is required"
        )
    )]
    #[serde(default)]
    pub location_name: String,

    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    #[validate(range(min = 0, message = "Capacity must not be negative"))]
    pub capacity: Option<i32>,

    #[serde(default = "default_available")]
    pub available: bool,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lng: Option<f64>,
}

fn default_available() -> bool {
    true
}

/// Request DTO for updating a resource; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateResourceDto {
    #[validate(
        length(max = 200, message = "Name must not exceed 200 characters"),
        regex(
            path = "*crate::shared::validation::NOT_BLANK_REGEX",
            message = "Name must not be blank"
        )
    )]
    pub name: Option<String>,

    #[validate(
        length(max = 255, message = "Location name must not exceed 255 characters"),
        regex(
            path = "*crate::shared::validation::NOT_BLANK_REGEX",
            message = "Location name must not be blank"
        )
    )]
    pub location_name: Option<String>,

    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,

    #[validate(range(min = 0, message = "Capacity must not be negative"))]
    pub capacity: Option<i32>,

    pub available: Option<bool>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lng: Option<f64>,
}

/// Query parameters for listing resources
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ResourceListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub disaster_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,
    pub available: Option<bool>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Radius in metres (default 10000), used with lat and lng
    pub radius: Option<f64>,
}

/// Query parameters for the nearby search
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ResourceNearbyQuery {
    pub lat: f64,
    pub lng: f64,
    /// Radius in metres (default 10000)
    pub radius: Option<f64>,
    pub disaster_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,
}

/// Resource counts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResourceStatisticsDto {
    pub total: usize,
    pub available: usize,
    pub total_capacity: i64,
    pub by_type: BTreeMap<String, usize>,
}
