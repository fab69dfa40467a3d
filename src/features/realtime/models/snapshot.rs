use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::disasters::dtos::DisasterResponseDto;
use crate::features::reports::dtos::ReportResponseDto;
use crate::modules::feeds::{EmergencyAlert, Shelter, WeatherAlert};
use crate::modules::social::SocialMediaPost;

/// Outcome of one source fetch in an aggregation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Ok,
    Cached,
    Failed,
}

/// Items of a single source, already correlated
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SourceSlice<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub status: SourceStatus,
    pub generated_at: DateTime<Utc>,
}

impl<T> SourceSlice<T> {
    pub fn new(items: Vec<T>, status: SourceStatus) -> Self {
        Self {
            total: items.len(),
            items,
            status,
            generated_at: Utc::now(),
        }
    }
}

/// Everything the dashboard shows, correlated to disasters
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RealtimeSnapshot {
    /// Set when the snapshot is scoped to one disaster
    pub disaster_id: Option<Uuid>,
    pub disasters: Vec<DisasterResponseDto>,
    pub reports: Vec<ReportResponseDto>,
    pub social_media: Vec<SocialMediaPost>,
    pub weather_alerts: Vec<WeatherAlert>,
    pub emergency_alerts: Vec<EmergencyAlert>,
    pub shelters: Vec<Shelter>,
    pub sources: BTreeMap<String, SourceStatus>,
    pub generated_at: DateTime<Utc>,
}

impl RealtimeSnapshot {
    /// Copy holding only items correlated with `disaster_id`
    pub fn scoped_to(&self, disaster_id: Uuid) -> RealtimeSnapshot {
        let wanted = Some(disaster_id);
        RealtimeSnapshot {
            disaster_id: wanted,
            disasters: self
                .disasters
                .iter()
                .filter(|d| d.id == disaster_id)
                .cloned()
                .collect(),
            reports: self
                .reports
                .iter()
                .filter(|r| r.disaster_id == disaster_id)
                .cloned()
                .collect(),
            social_media: self
                .social_media
                .iter()
                .filter(|p| p.disaster_id == wanted)
                .cloned()
                .collect(),
            weather_alerts: self
                .weather_alerts
                .iter()
                .filter(|a| a.disaster_id == wanted)
                .cloned()
                .collect(),
            emergency_alerts: self
                .emergency_alerts
                .iter()
                .filter(|a| a.disaster_id == wanted)
                .cloned()
                .collect(),
            shelters: self
                .shelters
                .iter()
                .filter(|s| s.disaster_id == wanted)
                .cloned()
                .collect(),
            sources: self.sources.clone(),
            generated_at: self.generated_at,
        }
    }

    pub fn item_count(&self) -> usize {
        self.disasters.len()
            + self.reports.len()
            + self.social_media.len()
            + self.weather_alerts.len()
            + self.emergency_alerts.len()
            + self.shelters.len()
    }
}

/// Poller health for the status endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PollerStatus {
    /// Background loop started
    pub running: bool,
    /// A poll is executing right now
    pub polling: bool,
    pub poll_count: u64,
    pub last_poll: Option<DateTime<Utc>>,
    pub last_duration_ms: Option<u64>,
    pub sources: BTreeMap<String, SourceStatus>,
    pub subscribers: usize,
    pub poll_interval_secs: u64,
}
