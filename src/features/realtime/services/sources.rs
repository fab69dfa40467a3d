use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::features::disasters::dtos::DisasterResponseDto;
use crate::features::disasters::repositories::DisasterRepository;
use crate::features::realtime::models::SourceStatus;
use crate::features::reports::dtos::ReportResponseDto;
use crate::features::reports::repositories::ReportRepository;
use crate::modules::cache::CacheService;
use crate::modules::feeds::{EmergencyAlert, FeedsClient, Shelter, WeatherAlert};
use crate::modules::social::{SocialMediaPost, SocialService, DEFAULT_QUERY};

/// Posts pulled per social poll
const SOCIAL_FETCH_LIMIT: usize = 40;

/// One upstream the aggregator reads from
#[async_trait]
pub trait FeedSource: Send + Sync {
    type Item: Serialize + DeserializeOwned + Clone + Send + Sync;

    fn name(&self) -> &'static str;

    fn cache_key(&self) -> String {
        format!("realtime:{}", self.name())
    }

    /// `None` means always fetch fresh
    fn ttl(&self) -> Option<Duration>;

    async fn fetch(&self) -> anyhow::Result<Vec<Self::Item>>;
}

/// Read a source through the cache. Failures become an empty, `failed` slice.
pub async fn load<S: FeedSource>(
    source: &S,
    cache: &CacheService,
) -> (Vec<S::Item>, SourceStatus) {
    let key = source.cache_key();
    if source.ttl().is_some() {
        if let Some(items) = cache.get_json::<Vec<S::Item>>(&key).await {
            return (items, SourceStatus::Cached);
        }
    }

    match source.fetch().await {
        Ok(items) => {
            if let Some(ttl) = source.ttl() {
                cache.set_json(&key, &items, ttl).await;
            }
            (items, SourceStatus::Ok)
        }
        Err(e) => {
            tracing::warn!("Realtime source '{}' failed: {:#}", source.name(), e);
            (Vec::new(), SourceStatus::Failed)
        }
    }
}

pub struct DisasterSource {
    pub repository: Arc<dyn DisasterRepository>,
}

#[async_trait]
impl FeedSource for DisasterSource {
    type Item = DisasterResponseDto;

    fn name(&self) -> &'static str {
        "disasters"
    }

    fn ttl(&self) -> Option<Duration> {
        None
    }

    async fn fetch(&self) -> anyhow::Result<Vec<DisasterResponseDto>> {
        let disasters = self.repository.all().await?;
        Ok(disasters.into_iter().map(Into::into).collect())
    }
}

pub struct ReportSource {
    pub repository: Arc<dyn ReportRepository>,
}

#[async_trait]
impl FeedSource for ReportSource {
    type Item = ReportResponseDto;

    fn name(&self) -> &'static str {
        "reports"
    }

    fn ttl(&self) -> Option<Duration> {
        None
    }

    async fn fetch(&self) -> anyhow::Result<Vec<ReportResponseDto>> {
        let reports = self.repository.all().await?;
        Ok(reports.into_iter().map(Into::into).collect())
    }
}

pub struct SocialSource {
    pub social: Arc<SocialService>,
    pub ttl: Duration,
}

#[async_trait]
impl FeedSource for SocialSource {
    type Item = SocialMediaPost;

    fn name(&self) -> &'static str {
        "social_media"
    }

    fn ttl(&self) -> Option<Duration> {
        Some(self.ttl)
    }

    async fn fetch(&self) -> anyhow::Result<Vec<SocialMediaPost>> {
        Ok(self
            .social
            .fetch_live(DEFAULT_QUERY, SOCIAL_FETCH_LIMIT)
            .await?)
    }
}

pub struct WeatherSource {
    pub client: Arc<FeedsClient>,
    pub ttl: Duration,
}

#[async_trait]
impl FeedSource for WeatherSource {
    type Item = WeatherAlert;

    fn name(&self) -> &'static str {
        "weather"
    }

    fn ttl(&self) -> Option<Duration> {
        Some(self.ttl)
    }

    async fn fetch(&self) -> anyhow::Result<Vec<WeatherAlert>> {
        Ok(self.client.fetch_weather_alerts().await?)
    }
}

pub struct EmergencySource {
    pub client: Arc<FeedsClient>,
    pub ttl: Duration,
}

#[async_trait]
impl FeedSource for EmergencySource {
    type Item = EmergencyAlert;

    fn name(&self) -> &'static str {
        "emergency"
    }

    fn ttl(&self) -> Option<Duration> {
        Some(self.ttl)
    }

    async fn fetch(&self) -> anyhow::Result<Vec<EmergencyAlert>> {
        Ok(self.client.fetch_emergency_declarations().await?)
    }
}

pub struct ShelterSource {
    pub client: Arc<FeedsClient>,
    pub ttl: Duration,
}

#[async_trait]
impl FeedSource for ShelterSource {
    type Item = Shelter;

    fn name(&self) -> &'static str {
        "shelters"
    }

    fn ttl(&self) -> Option<Duration> {
        Some(self.ttl)
    }

    async fn fetch(&self) -> anyhow::Result<Vec<Shelter>> {
        Ok(self.client.fetch_shelters().await?)
    }
}
