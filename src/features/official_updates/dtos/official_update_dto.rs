use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::modules::feeds::{EmergencyAlert, WeatherAlert};
use crate::modules::social::SocialMediaPost;

pub const DEFAULT_UPDATE_LIMIT: usize = 20;
pub const MAX_UPDATE_LIMIT: usize = 100;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct OfficialUpdatesQuery {
    pub disaster_id: Option<Uuid>,
    pub limit: Option<usize>,
}

impl OfficialUpdatesQuery {
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_UPDATE_LIMIT)
            .clamp(1, MAX_UPDATE_LIMIT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UpdateSource {
    Fema,
    WeatherService,
    SocialMedia,
}

/// One announcement from an official channel
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfficialUpdateDto {
    pub id: String,
    pub source: UpdateSource,
    pub title: String,
    pub content: String,
    pub author: String,
    pub severity: Option<String>,
    pub url: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub disaster_id: Option<Uuid>,
}

impl From<EmergencyAlert> for OfficialUpdateDto {
    fn from(alert: EmergencyAlert) -> Self {
        Self {
            content: format!(
                "{} declaration for {}, {} ({})",
                alert.declaration_type, alert.designated_area, alert.state, alert.incident_type
            ),
            id: alert.id,
            source: UpdateSource::Fema,
            title: alert.title,
            author: "FEMA".to_string(),
            severity: None,
            url: None,
            timestamp: alert.declaration_date,
            disaster_id: alert.disaster_id,
        }
    }
}

impl From<WeatherAlert> for OfficialUpdateDto {
    fn from(alert: WeatherAlert) -> Self {
        Self {
            title: alert.headline.clone().unwrap_or_else(|| alert.event.clone()),
            content: format!("{} for {}", alert.event, alert.area_description),
            id: alert.id,
            source: UpdateSource::WeatherService,
            author: "National Weather Service".to_string(),
            severity: Some(alert.severity),
            url: None,
            timestamp: alert.effective,
            disaster_id: alert.disaster_id,
        }
    }
}

impl From<SocialMediaPost> for OfficialUpdateDto {
    fn from(post: SocialMediaPost) -> Self {
        let title: String = post.content.chars().take(80).collect();
        Self {
            id: post.id,
            source: UpdateSource::SocialMedia,
            title,
            content: post.content,
            author: post.username,
            severity: Some(post.priority.to_string()),
            url: post.url,
            timestamp: Some(post.timestamp),
            disaster_id: post.disaster_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfficialUpdatesResponseDto {
    pub updates: Vec<OfficialUpdateDto>,
    pub total: usize,
}
