use std::sync::Arc;

use uuid::Uuid;

use crate::features::disasters::DisasterService;
use crate::features::official_updates::dtos::OfficialUpdateDto;
use crate::features::realtime::Aggregator;
use crate::modules::social::SocialService;

/// Posts scanned for official accounts
const SOCIAL_SCAN_LIMIT: usize = 40;

/// Merges emergency declarations, weather alerts and official social posts
pub struct OfficialUpdateService {
    aggregator: Arc<Aggregator>,
    social: Arc<SocialService>,
    disasters: Arc<DisasterService>,
}

impl OfficialUpdateService {
    pub fn new(
        aggregator: Arc<Aggregator>,
        social: Arc<SocialService>,
        disasters: Arc<DisasterService>,
    ) -> Self {
        Self {
            aggregator,
            social,
            disasters,
        }
    }

    /// Newest first; items without a timestamp go last
    pub async fn list(&self, disaster_id: Option<Uuid>, limit: usize) -> Vec<OfficialUpdateDto> {
        let refs = self.disasters.refs().await.unwrap_or_else(|e| {
            tracing::warn!("Loading disasters for official updates failed: {}", e);
            Vec::new()
        });

        let (emergency, weather, feed) = tokio::join!(
            self.aggregator.emergency_alerts(disaster_id),
            self.aggregator.weather(disaster_id),
            self.social.search("", SOCIAL_SCAN_LIMIT, &refs),
        );

        let mut updates: Vec<OfficialUpdateDto> = emergency
            .items
            .into_iter()
            .map(Into::into)
            .chain(weather.items.into_iter().map(Into::into))
            .chain(
                feed.posts
                    .into_iter()
                    .filter(|p| p.is_official)
                    .filter(|p| disaster_id.map_or(true, |id| p.disaster_id == Some(id)))
                    .map(Into::into),
            )
            .collect();

        updates.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        updates.truncate(limit);
        updates
    }
}
