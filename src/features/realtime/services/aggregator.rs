use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::sources::{
    load, DisasterSource, EmergencySource, FeedSource, ReportSource, ShelterSource,
    SocialSource, WeatherSource,
};
use crate::features::disasters::dtos::DisasterResponseDto;
use crate::features::realtime::models::{RealtimeSnapshot, SourceSlice, SourceStatus};
use crate::modules::cache::CacheService;
use crate::modules::feeds::{EmergencyAlert, Shelter, WeatherAlert};
use crate::modules::social::{correlate, SocialMediaPost};
use crate::shared::correlation::{match_by_distance, match_by_location, DisasterRef};

pub struct AggregatorSources {
    pub disasters: DisasterSource,
    pub reports: ReportSource,
    pub social: SocialSource,
    pub weather: WeatherSource,
    pub emergency: EmergencySource,
    pub shelters: ShelterSource,
}

/// Fetches every source concurrently and ties the items to disasters.
///
/// A failing source never fails the aggregate; its slice is empty and its
/// status is `failed`.
pub struct Aggregator {
    cache: Arc<CacheService>,
    sources: AggregatorSources,
    correlation_radius_km: f64,
}

fn refs_of(disasters: &[DisasterResponseDto]) -> Vec<DisasterRef> {
    disasters
        .iter()
        .map(|d| DisasterRef {
            id: d.id,
            title: d.title.clone(),
            location_name: d.location_name.clone(),
            tags: d.tags.clone(),
            coordinates: d.location,
        })
        .collect()
}

fn correlate_weather(alerts: &mut [WeatherAlert], refs: &[DisasterRef]) {
    for alert in alerts.iter_mut() {
        alert.disaster_id = match_by_location(&alert.area_description, refs);
    }
}

fn correlate_emergency(alerts: &mut [EmergencyAlert], refs: &[DisasterRef]) {
    for alert in alerts.iter_mut() {
        let area = format!("{} {}", alert.designated_area, alert.state);
        alert.disaster_id = match_by_location(&area, refs);
    }
}

fn correlate_shelters(shelters: &mut [Shelter], refs: &[DisasterRef], radius_km: f64) {
    for shelter in shelters.iter_mut() {
        shelter.disaster_id = shelter
            .coordinates
            .and_then(|c| match_by_distance(&c, refs, radius_km))
            .or_else(|| match_by_location(&shelter.location_text(), refs));
    }
}

fn correlate_posts(posts: &mut [SocialMediaPost], refs: &[DisasterRef]) {
    for post in posts.iter_mut() {
        post.disaster_id = None;
    }
    correlate(posts, refs);
}

/// Keep only items whose correlated disaster equals `filter`
fn retain_for<T>(items: &mut Vec<T>, filter: Option<Uuid>, disaster_of: impl Fn(&T) -> Option<Uuid>) {
    if let Some(id) = filter {
        items.retain(|item| disaster_of(item) == Some(id));
    }
}

impl Aggregator {
    pub fn new(
        cache: Arc<CacheService>,
        sources: AggregatorSources,
        correlation_radius_km: f64,
    ) -> Self {
        Self {
            cache,
            sources,
            correlation_radius_km,
        }
    }

    /// Build a full snapshot, optionally scoped to one disaster
    pub async fn aggregate(&self, disaster_id: Option<Uuid>) -> RealtimeSnapshot {
        let s = &self.sources;
        let cache = self.cache.as_ref();

        let (
            (disasters, disasters_status),
            (reports, reports_status),
            (mut posts, social_status),
            (mut weather, weather_status),
            (mut emergency, emergency_status),
            (mut shelters, shelters_status),
        ) = tokio::join!(
            load(&s.disasters, cache),
            load(&s.reports, cache),
            load(&s.social, cache),
            load(&s.weather, cache),
            load(&s.emergency, cache),
            load(&s.shelters, cache),
        );

        let refs = refs_of(&disasters);
        correlate_posts(&mut posts, &refs);
        correlate_weather(&mut weather, &refs);
        correlate_emergency(&mut emergency, &refs);
        correlate_shelters(&mut shelters, &refs, self.correlation_radius_km);

        let sources: BTreeMap<String, SourceStatus> = [
            (s.disasters.name(), disasters_status),
            (s.reports.name(), reports_status),
            (s.social.name(), social_status),
            (s.weather.name(), weather_status),
            (s.emergency.name(), emergency_status),
            (s.shelters.name(), shelters_status),
        ]
        .into_iter()
        .map(|(name, status)| (name.to_string(), status))
        .collect();

        let snapshot = RealtimeSnapshot {
            disaster_id: None,
            disasters,
            reports,
            social_media: posts,
            weather_alerts: weather,
            emergency_alerts: emergency,
            shelters,
            sources,
            generated_at: Utc::now(),
        };

        match disaster_id {
            Some(id) => snapshot.scoped_to(id),
            None => snapshot,
        }
    }

    /// Current disasters, read straight from storage
    async fn refs(&self) -> Vec<DisasterRef> {
        let (disasters, _) = load(&self.sources.disasters, &self.cache).await;
        refs_of(&disasters)
    }

    pub async fn disasters(&self, disaster_id: Option<Uuid>) -> SourceSlice<DisasterResponseDto> {
        let (mut items, status) = load(&self.sources.disasters, &self.cache).await;
        retain_for(&mut items, disaster_id, |d| Some(d.id));
        SourceSlice::new(items, status)
    }

    pub async fn social_media(&self, disaster_id: Option<Uuid>) -> SourceSlice<SocialMediaPost> {
        let ((mut items, status), refs) =
            tokio::join!(load(&self.sources.social, &self.cache), self.refs());
        correlate_posts(&mut items, &refs);
        retain_for(&mut items, disaster_id, |p| p.disaster_id);
        SourceSlice::new(items, status)
    }

    pub async fn weather(&self, disaster_id: Option<Uuid>) -> SourceSlice<WeatherAlert> {
        let ((mut items, status), refs) =
            tokio::join!(load(&self.sources.weather, &self.cache), self.refs());
        correlate_weather(&mut items, &refs);
        retain_for(&mut items, disaster_id, |a| a.disaster_id);
        SourceSlice::new(items, status)
    }

    pub async fn emergency_alerts(&self, disaster_id: Option<Uuid>) -> SourceSlice<EmergencyAlert> {
        let ((mut items, status), refs) =
            tokio::join!(load(&self.sources.emergency, &self.cache), self.refs());
        correlate_emergency(&mut items, &refs);
        retain_for(&mut items, disaster_id, |a| a.disaster_id);
        SourceSlice::new(items, status)
    }

    pub async fn shelters(&self, disaster_id: Option<Uuid>) -> SourceSlice<Shelter> {
        let ((mut items, status), refs) =
            tokio::join!(load(&self.sources.shelters, &self.cache), self.refs());
        correlate_shelters(&mut items, &refs, self.correlation_radius_km);
        retain_for(&mut items, disaster_id, |s| s.disaster_id);
        SourceSlice::new(items, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::features::fixtures::FixtureStore;
    use crate::shared::geo::Coordinates;
    use crate::shared::test_helpers::{offline_aggregator, TestContext};

    fn shelter(id: &str, coordinates: Option<Coordinates>) -> Shelter {
        Shelter {
            id: id.to_string(),
            name: format!("Shelter {}", id),
            address: None,
            city: Some("Somewhere".to_string()),
            state: None,
            coordinates,
            capacity: Some(100),
            population: Some(10),
            status: "OPEN".to_string(),
            disaster_id: None,
        }
    }

    #[tokio::test]
    async fn test_failed_sources_are_isolated() {
        let ctx = TestContext::new();
        let store = Arc::new(FixtureStore::seeded());
        let expected = store.disasters.read().await.len();
        let aggregator = offline_aggregator(&ctx, store);

        let snapshot = aggregator.aggregate(None).await;

        assert_eq!(snapshot.disasters.len(), expected);
        assert!(!snapshot.reports.is_empty());
        assert!(snapshot.weather_alerts.is_empty());
        assert_eq!(snapshot.sources["disasters"], SourceStatus::Ok);
        assert_eq!(snapshot.sources["reports"], SourceStatus::Ok);
        for name in ["social_media", "weather", "emergency", "shelters"] {
            assert_eq!(snapshot.sources[name], SourceStatus::Failed, "{}", name);
        }
    }

    #[tokio::test]
    async fn test_cache_hit_short_circuits_one_source() {
        let ctx = TestContext::new();
        let store = Arc::new(FixtureStore::seeded());
        let manhattan = store.disasters.read().await[0].clone();
        let aggregator = offline_aggregator(&ctx, store);

        let near = manhattan.coordinates().unwrap();
        let far = Coordinates::new(near.lat + 5.0, near.lng);
        ctx.cache
            .set_json(
                "realtime:shelters",
                &vec![shelter("near", Some(near)), shelter("far", Some(far))],
                Duration::from_secs(60),
            )
            .await;

        let snapshot = aggregator.aggregate(None).await;
        assert_eq!(snapshot.sources["shelters"], SourceStatus::Cached);
        assert_eq!(snapshot.sources["weather"], SourceStatus::Failed);

        let by_id: BTreeMap<_, _> = snapshot
            .shelters
            .iter()
            .map(|s| (s.id.as_str(), s.disaster_id))
            .collect();
        assert_eq!(by_id["near"], Some(manhattan.id));
        assert_eq!(by_id["far"], None);
    }

    #[tokio::test]
    async fn test_filter_keeps_only_matching_items() {
        let ctx = TestContext::new();
        let store = Arc::new(FixtureStore::seeded());
        let target = store.disasters.read().await[0].id;
        let aggregator = offline_aggregator(&ctx, store);

        ctx.cache
            .set_json(
                "realtime:shelters",
                &vec![shelter("uncorrelated", None)],
                Duration::from_secs(60),
            )
            .await;

        let snapshot = aggregator.aggregate(Some(target)).await;
        assert_eq!(snapshot.disaster_id, Some(target));
        assert!(snapshot.disasters.iter().all(|d| d.id == target));
        assert!(snapshot.reports.iter().all(|r| r.disaster_id == target));
        assert!(snapshot.shelters.is_empty());

        let slice = aggregator.shelters(Some(target)).await;
        assert_eq!(slice.status, SourceStatus::Cached);
        assert!(slice.items.is_empty());
    }
}
