use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use super::fixtures::fixture_posts;
use super::mastodon::{MastodonClient, SocialError, Status};
use super::models::{PostOrigin, SocialFeed, SocialMediaPost};
use super::classify::classify_priority;
use crate::modules::cache::CacheService;
use crate::shared::constants::CACHE_PREFIX_SOCIAL;
use crate::shared::correlation::{match_by_keywords, DisasterRef};

/// Query used when a caller asks for posts without one
pub const DEFAULT_QUERY: &str = "disaster emergency flood fire";

pub struct SocialService {
    client: MastodonClient,
    cache: Arc<CacheService>,
    cache_ttl: Duration,
    official_accounts: Vec<String>,
}

/// Attach disaster ids by keyword overlap
pub fn correlate(posts: &mut [SocialMediaPost], disasters: &[DisasterRef]) {
    for post in posts.iter_mut() {
        if post.disaster_id.is_none() {
            post.disaster_id = match_by_keywords(&post.content, disasters);
        }
    }
}

impl SocialService {
    pub fn new(
        client: MastodonClient,
        cache: Arc<CacheService>,
        cache_ttl: Duration,
        official_accounts: Vec<String>,
    ) -> Self {
        Self {
            client,
            cache,
            cache_ttl,
            official_accounts,
        }
    }

    fn normalize(&self, statuses: Vec<Status>) -> Vec<SocialMediaPost> {
        statuses
            .into_iter()
            .map(|s| s.into_post(&self.official_accounts))
            .collect()
    }

    /// Live search without any fallback.
    ///
    /// With a token this is a full-text search; without one the instance only
    /// serves public hashtag timelines, so the first query word is used as a tag.
    pub async fn fetch_live(&self, query: &str, limit: usize) -> Result<Vec<SocialMediaPost>, SocialError> {
        let statuses = if self.client.has_token() {
            self.client.search(query, limit).await?
        } else {
            let tag: String = query
                .split_whitespace()
                .next()
                .unwrap_or("disaster")
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect();
            self.client.hashtag_timeline(&tag, limit).await?
        };
        Ok(self.normalize(statuses))
    }

    /// Search posts: cache, then live, then fixtures. Never fails.
    pub async fn search(&self, query: &str, limit: usize, disasters: &[DisasterRef]) -> SocialFeed {
        let defaulted = query.trim().is_empty();
        let query = if defaulted { DEFAULT_QUERY } else { query.trim() };
        let key = format!(
            "{}:search:{}:{}",
            CACHE_PREFIX_SOCIAL,
            query.to_lowercase(),
            limit
        );

        let (mut posts, origin) = match self.cache.get_json::<Vec<SocialMediaPost>>(&key).await {
            Some(posts) => (posts, PostOrigin::Cached),
            None => match self.fetch_live(query, limit).await {
                Ok(posts) => {
                    self.cache.set_json(&key, &posts, self.cache_ttl).await;
                    (posts, PostOrigin::Live)
                }
                Err(e) => {
                    tracing::warn!("Social search failed, serving fixtures: {}", e);
                    // No query from the caller means every fixture is relevant
                    let filter = if defaulted { "" } else { query };
                    (fixture_posts(filter, limit), PostOrigin::Fixture)
                }
            },
        };

        correlate(&mut posts, disasters);
        SocialFeed { posts, origin }
    }

    pub async fn timeline(&self, hashtag: &str, limit: usize, disasters: &[DisasterRef]) -> SocialFeed {
        let (mut posts, origin) = match self.client.hashtag_timeline(hashtag, limit).await {
            Ok(statuses) => (self.normalize(statuses), PostOrigin::Live),
            Err(e) => {
                tracing::warn!("Hashtag timeline failed, serving fixtures: {}", e);
                (fixture_posts(hashtag, limit), PostOrigin::Fixture)
            }
        };
        correlate(&mut posts, disasters);
        SocialFeed { posts, origin }
    }

    pub async fn trending(&self, limit: usize, disasters: &[DisasterRef]) -> SocialFeed {
        let (mut posts, origin) = match self.client.trending(limit).await {
            Ok(statuses) => (self.normalize(statuses), PostOrigin::Live),
            Err(e) => {
                tracing::warn!("Trending statuses failed, serving fixtures: {}", e);
                let mut posts = fixture_posts("", limit);
                posts.sort_by_key(|p| {
                    std::cmp::Reverse(p.engagement.as_ref().map_or(0, |e| e.likes + e.shares))
                });
                (posts, PostOrigin::Fixture)
            }
        };
        correlate(&mut posts, disasters);
        SocialFeed { posts, origin }
    }

    /// Publish a status. Without a token (or when the instance refuses) the
    /// post is simulated locally and returned with origin `fixture`.
    pub async fn post(&self, content: &str, disasters: &[DisasterRef]) -> (SocialMediaPost, PostOrigin) {
        let (mut post, origin) = match self.client.post_status(content).await {
            Ok(status) => (status.into_post(&self.official_accounts), PostOrigin::Live),
            Err(e) => {
                tracing::warn!("Posting to Mastodon failed, simulating post: {}", e);
                let post = SocialMediaPost {
                    id: format!("local-{}", uuid::Uuid::new_v4()),
                    platform: "mastodon".to_string(),
                    username: "disaster_response".to_string(),
                    content: content.to_string(),
                    timestamp: Utc::now(),
                    disaster_id: None,
                    priority: classify_priority(content),
                    engagement: None,
                    url: None,
                    is_official: false,
                };
                (post, PostOrigin::Fixture)
            }
        };
        post.disaster_id = match_by_keywords(&post.content, disasters);
        (post, origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::cache::MemoryCacheStore;
    use crate::shared::types::Priority;
    use uuid::Uuid;

    fn service() -> (SocialService, Arc<CacheService>) {
        let cache = Arc::new(CacheService::new(Arc::new(MemoryCacheStore::new())));
        let client =
            MastodonClient::new("http://127.0.0.1:9", None, Duration::from_millis(200)).unwrap();
        let svc = SocialService::new(
            client,
            Arc::clone(&cache),
            Duration::from_secs(60),
            vec!["fema".to_string()],
        );
        (svc, cache)
    }

    fn nyc_flood() -> DisasterRef {
        DisasterRef {
            id: Uuid::new_v4(),
            title: "NYC Flood".into(),
            location_name: "Manhattan, NYC".into(),
            tags: vec!["flood".into(), "nycflood".into()],
            coordinates: None,
        }
    }

    #[tokio::test]
    async fn test_search_falls_back_to_fixtures_and_correlates() {
        let (svc, _) = service();
        let disaster = nyc_flood();
        let feed = svc.search("nycflood", 20, &[disaster.clone()]).await;

        assert_eq!(feed.origin, PostOrigin::Fixture);
        assert!(!feed.posts.is_empty());
        assert!(feed.posts.iter().all(|p| p.disaster_id == Some(disaster.id)));
    }

    #[tokio::test]
    async fn test_search_serves_cache_first() {
        let (svc, cache) = service();
        let cached = fixture_posts("", 1);
        cache
            .set_json(
                "social:search:flood:5",
                &cached,
                Duration::from_secs(60),
            )
            .await;

        let feed = svc.search("Flood", 5, &[]).await;
        assert_eq!(feed.origin, PostOrigin::Cached);
        assert_eq!(feed.posts.len(), 1);
    }

    #[tokio::test]
    async fn test_post_is_simulated_without_token() {
        let (svc, _) = service();
        let (post, origin) = svc.post("Evacuate the riverside now", &[]).await;
        assert_eq!(origin, PostOrigin::Fixture);
        assert!(post.id.starts_with("local-"));
        assert_eq!(post.priority, Priority::High);
    }

    #[tokio::test]
    async fn test_trending_fallback_sorted_by_engagement() {
        let (svc, _) = service();
        let feed = svc.trending(5, &[]).await;
        let scores: Vec<i64> = feed
            .posts
            .iter()
            .map(|p| p.engagement.as_ref().map_or(0, |e| e.likes + e.shares))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }
}
