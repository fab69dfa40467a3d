use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::config::Config;

/// Which optional integrations are usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FeatureFlagsDto {
    pub database: bool,
    pub ai: bool,
    pub social_media: bool,
    pub geocoding: bool,
    pub realtime: bool,
}

impl FeatureFlagsDto {
    /// Flags derivable from configuration alone; `database` is probed per request
    pub fn from_config(config: &Config) -> Self {
        Self {
            database: false,
            ai: config.ai.api_key.is_some(),
            social_media: config.social.access_token.is_some(),
            geocoding: true,
            realtime: config.realtime.enabled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponseDto {
    /// Always "OK" while the process is serving
    pub status: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
    pub features: FeatureFlagsDto,
}
