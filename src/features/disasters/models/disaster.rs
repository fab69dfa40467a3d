use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::correlation::DisasterRef;
use crate::shared::geo::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
}

/// One append-only audit trail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AuditEntry {
    pub fn new(action: AuditAction, user_id: &str, details: Option<String>) -> Self {
        Self {
            action,
            user_id: user_id.to_string(),
            timestamp: Utc::now(),
            details,
        }
    }
}

/// Database model for disaster
#[derive(Debug, Clone, FromRow)]
pub struct Disaster {
    pub id: Uuid,
    pub title: String,
    pub location_name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub description: String,
    pub tags: Vec<String>,
    pub owner_id: String,
    pub audit_trail: Json<Vec<AuditEntry>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Disaster {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.lat, self.lng)
    }

    pub fn to_ref(&self) -> DisasterRef {
        DisasterRef {
            id: self.id,
            title: self.title.clone(),
            location_name: self.location_name.clone(),
            tags: self.tags.clone(),
            coordinates: self.coordinates(),
        }
    }

    /// Case-insensitive match over title, description and location
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [&self.title, &self.description, &self.location_name]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// List filters for disasters
#[derive(Debug, Clone, Default)]
pub struct DisasterFilter {
    pub tag: Option<String>,
    pub owner_id: Option<String>,
    pub search: Option<String>,
}

impl DisasterFilter {
    pub fn matches(&self, disaster: &Disaster) -> bool {
        self.tag
            .as_ref()
            .map_or(true, |tag| disaster.tags.iter().any(|t| t == tag))
            && self
                .owner_id
                .as_ref()
                .map_or(true, |owner| &disaster.owner_id == owner)
            && self
                .search
                .as_ref()
                .map_or(true, |needle| disaster.matches_search(needle))
    }
}
