use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::geo::Coordinates;

/// Resource type enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "resource_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Shelter,
    Hospital,
    Food,
    Water,
    Medical,
    Transport,
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceType::Shelter => write!(f, "shelter"),
            ResourceType::Hospital => write!(f, "hospital"),
            ResourceType::Food => write!(f, "food"),
            ResourceType::Water => write!(f, "water"),
            ResourceType::Medical => write!(f, "medical"),
            ResourceType::Transport => write!(f, "transport"),
        }
    }
}

/// Database model for resource
#[derive(Debug, Clone, FromRow)]
pub struct Resource {
    pub id: Uuid,
    pub disaster_id: Uuid,
    pub name: String,
    pub location_name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub resource_type: ResourceType,
    pub capacity: Option<i32>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl Resource {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.lat, self.lng)
    }
}

/// List filters for resources. `near` is honoured by the database only.
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub disaster_id: Option<Uuid>,
    pub resource_type: Option<ResourceType>,
    pub available: Option<bool>,
    /// Centre point and radius in metres
    pub near: Option<(Coordinates, f64)>,
}

impl ResourceFilter {
    /// Attribute filters only; distance is not applied here
    pub fn matches_attributes(&self, resource: &Resource) -> bool {
        self.disaster_id.map_or(true, |id| resource.disaster_id == id)
            && self
                .resource_type
                .map_or(true, |t| resource.resource_type == t)
            && self.available.map_or(true, |a| resource.available == a)
    }
}
