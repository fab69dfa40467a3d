use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::geo::Coordinates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherAlert {
    pub id: String,
    pub event: String,
    pub headline: Option<String>,
    pub severity: String,
    pub urgency: String,
    pub area_description: String,
    pub effective: Option<DateTime<Utc>>,
    pub expires: Option<DateTime<Utc>>,
    pub disaster_id: Option<Uuid>,
}

/// A federal disaster declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmergencyAlert {
    pub id: String,
    pub title: String,
    pub declaration_type: String,
    pub incident_type: String,
    pub state: String,
    pub designated_area: String,
    pub declaration_date: Option<DateTime<Utc>>,
    pub disaster_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Shelter {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub capacity: Option<i64>,
    pub population: Option<i64>,
    pub status: String,
    pub disaster_id: Option<Uuid>,
}

impl Shelter {
    /// "address, city, state" with missing parts skipped
    pub fn location_text(&self) -> String {
        [&self.address, &self.city, &self.state]
            .iter()
            .filter_map(|p| p.as_deref())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Lenient timestamp parsing for upstream feeds (RFC 3339 with any offset)
pub(super) fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
