use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::disasters::DisasterService;
use crate::features::social_media::handlers;
use crate::modules::events::EventHub;
use crate::modules::social::SocialService;
use crate::shared::correlation::DisasterRef;

#[derive(Clone)]
pub struct SocialMediaState {
    pub social: Arc<SocialService>,
    pub disasters: Arc<DisasterService>,
    pub events: Arc<EventHub>,
}

impl SocialMediaState {
    /// Disasters to correlate against; empty when storage is unavailable
    pub async fn disaster_refs(&self) -> Vec<DisasterRef> {
        match self.disasters.refs().await {
            Ok(refs) => refs,
            Err(e) => {
                tracing::warn!("Loading disasters for correlation failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Create routes for the social media feature
pub fn routes(
    social: Arc<SocialService>,
    disasters: Arc<DisasterService>,
    events: Arc<EventHub>,
) -> Router {
    Router::new()
        .route("/api/social-media/search", get(handlers::search_posts))
        .route("/api/social-media/urgent", get(handlers::urgent_posts))
        .route("/api/social-media/official", get(handlers::official_posts))
        .route("/api/social-media/trending", get(handlers::trending_posts))
        .route("/api/social-media/post", post(handlers::create_post))
        .with_state(SocialMediaState {
            social,
            disasters,
            events,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::disasters::repositories::MemoryDisasterRepository;
    use crate::features::fixtures::FixtureStore;
    use crate::modules::events::EventKind;
    use crate::modules::social::MastodonClient;
    use crate::shared::test_helpers::{TestContext, UNREACHABLE_URL};

    fn server(ctx: &TestContext) -> TestServer {
        let client = MastodonClient::new(UNREACHABLE_URL, None, Duration::from_millis(200)).unwrap();
        let social = Arc::new(SocialService::new(
            client,
            ctx.cache.clone(),
            Duration::from_secs(60),
            vec!["fema".to_string()],
        ));
        let disasters = Arc::new(DisasterService::new(
            Arc::new(MemoryDisasterRepository::new(Arc::new(FixtureStore::seeded()))),
            ctx.ai.clone(),
            ctx.geocoder.clone(),
            ctx.events.clone(),
        ));
        TestServer::new(routes(social, disasters, ctx.events.clone())).unwrap()
    }

    #[tokio::test]
    async fn test_search_serves_fixtures_offline() {
        let ctx = TestContext::new();
        let body: Value = server(&ctx)
            .get("/api/social-media/search?q=shelter")
            .await
            .json();

        assert_eq!(body["data"]["origin"], "fixture");
        assert!(body["data"]["total"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_urgent_only_high_priority() {
        let ctx = TestContext::new();
        let body: Value = server(&ctx).get("/api/social-media/urgent").await.json();
        let posts = body["data"]["posts"].as_array().unwrap();

        assert!(!posts.is_empty());
        assert!(posts
            .iter()
            .all(|p| p["priority"] == "urgent" || p["priority"] == "high"));
    }

    #[tokio::test]
    async fn test_official_only() {
        let ctx = TestContext::new();
        let body: Value = server(&ctx).get("/api/social-media/official").await.json();
        let posts = body["data"]["posts"].as_array().unwrap();

        assert!(!posts.is_empty());
        assert!(posts.iter().all(|p| p["is_official"] == true));
    }

    #[tokio::test]
    async fn test_post_broadcasts() {
        let ctx = TestContext::new();
        let server = server(&ctx);
        let mut rx = ctx.events.subscribe();

        let response = server
            .post("/api/social-media/post")
            .json(&json!({"content": "Road closed near the river, avoid the area"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Value>()["data"]["origin"], "fixture");

        let event = rx.try_recv().unwrap();
        assert_eq!(event.event, EventKind::SocialMediaUpdated);
    }

    #[tokio::test]
    async fn test_blank_post_rejected() {
        let ctx = TestContext::new();
        server(&ctx)
            .post("/api/social-media/post")
            .json(&json!({"content": "  "}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
