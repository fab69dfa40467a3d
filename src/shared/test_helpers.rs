#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use std::time::Duration;

#[cfg(test)]
use crate::modules::ai::AiService;
#[cfg(test)]
use crate::modules::cache::{CacheService, MemoryCacheStore};
#[cfg(test)]
use crate::modules::events::EventHub;
#[cfg(test)]
use crate::modules::geocoding::GeocodingService;

/// Nothing listens here, so outbound calls fail fast
#[cfg(test)]
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

/// Offline collaborators shared by service and handler tests: in-memory
/// cache, no generative model, unreachable geocoder
#[cfg(test)]
#[allow(dead_code)]
pub struct TestContext {
    pub cache: Arc<CacheService>,
    pub ai: Arc<AiService>,
    pub geocoder: Arc<GeocodingService>,
    pub events: Arc<EventHub>,
}

#[cfg(test)]
impl TestContext {
    pub fn new() -> Self {
        let cache = Arc::new(CacheService::new(Arc::new(MemoryCacheStore::new())));
        let ai = Arc::new(AiService::new(
            None,
            cache.clone(),
            Duration::from_secs(60),
            true,
        ));
        let geocoder = Arc::new(
            GeocodingService::new(
                UNREACHABLE_URL,
                "disaster-response-tests",
                Duration::from_millis(500),
                cache.clone(),
                Duration::from_secs(60),
            )
            .expect("geocoding client"),
        );

        Self {
            cache,
            ai,
            geocoder,
            events: Arc::new(EventHub::new()),
        }
    }
}

/// Aggregator over the fixture store whose network sources all fail
#[cfg(test)]
#[allow(dead_code)]
pub fn offline_aggregator(
    ctx: &TestContext,
    store: Arc<crate::features::fixtures::FixtureStore>,
) -> crate::features::realtime::services::Aggregator {
    use crate::core::config::FeedsConfig;
    use crate::features::disasters::repositories::MemoryDisasterRepository;
    use crate::features::realtime::services::{
        Aggregator, AggregatorSources, DisasterSource, EmergencySource, ReportSource,
        ShelterSource, SocialSource, WeatherSource,
    };
    use crate::features::reports::repositories::MemoryReportRepository;
    use crate::modules::feeds::FeedsClient;
    use crate::modules::social::{MastodonClient, SocialService};

    let feeds = Arc::new(
        FeedsClient::new(
            &FeedsConfig {
                weather_url: UNREACHABLE_URL.to_string(),
                fema_url: UNREACHABLE_URL.to_string(),
                shelters_url: UNREACHABLE_URL.to_string(),
                geocoding_url: UNREACHABLE_URL.to_string(),
                user_agent: "disaster-response-tests".to_string(),
            },
            Duration::from_millis(300),
        )
        .expect("feeds client"),
    );
    let social = Arc::new(SocialService::new(
        MastodonClient::new(UNREACHABLE_URL, None, Duration::from_millis(300))
            .expect("mastodon client"),
        ctx.cache.clone(),
        Duration::from_secs(30),
        Vec::new(),
    ));

    Aggregator::new(
        ctx.cache.clone(),
        AggregatorSources {
            disasters: DisasterSource {
                repository: Arc::new(MemoryDisasterRepository::new(store.clone())),
            },
            reports: ReportSource {
                repository: Arc::new(MemoryReportRepository::new(store)),
            },
            social: SocialSource {
                social,
                ttl: Duration::from_secs(30),
            },
            weather: WeatherSource {
                client: feeds.clone(),
                ttl: Duration::from_secs(300),
            },
            emergency: EmergencySource {
                client: feeds.clone(),
                ttl: Duration::from_secs(900),
            },
            shelters: ShelterSource {
                client: feeds,
                ttl: Duration::from_secs(600),
            },
        },
        100.0,
    )
}
