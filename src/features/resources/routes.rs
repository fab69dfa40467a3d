use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::resources::handlers;
use crate::features::resources::services::ResourceService;

/// Create routes for the resources feature
pub fn routes(service: Arc<ResourceService>) -> Router {
    Router::new()
        .route(
            "/api/resources",
            get(handlers::list_resources).post(handlers::create_resource),
        )
        .route("/api/resources/nearby", get(handlers::nearby_resources))
        .route("/api/resources/statistics", get(handlers::resource_statistics))
        .route(
            "/api/resources/{id}",
            get(handlers::get_resource)
                .put(handlers::update_resource)
                .delete(handlers::delete_resource),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::disasters::repositories::MemoryDisasterRepository;
    use crate::features::fixtures::FixtureStore;
    use crate::features::resources::repositories::MemoryResourceRepository;
    use crate::shared::test_helpers::TestContext;

    async fn server() -> (TestServer, Arc<FixtureStore>) {
        let ctx = TestContext::new();
        let store = Arc::new(FixtureStore::seeded());
        let service = Arc::new(ResourceService::new(
            Arc::new(MemoryResourceRepository::new(store.clone())),
            Arc::new(MemoryDisasterRepository::new(store.clone())),
            ctx.geocoder.clone(),
            ctx.events.clone(),
        ));
        (TestServer::new(routes(service)).unwrap(), store)
    }

    #[tokio::test]
    async fn test_list_with_radius_returns_unfiltered_in_memory() {
        let (server, store) = server().await;
        let total = store.resources.read().await.len();

        let body: Value = server
            .get("/api/resources?lat=40.7128&lng=-74.0060&radius=5000&limit=100")
            .await
            .json();
        assert_eq!(body["data"].as_array().unwrap().len(), total);
        assert_eq!(body["pagination"]["total"], total as u64);
    }

    #[tokio::test]
    async fn test_filter_by_type() {
        let (server, _) = server().await;
        let body: Value = server.get("/api/resources?type=shelter").await.json();
        let items = body["data"].as_array().unwrap();
        assert!(!items.is_empty());
        assert!(items.iter().all(|r| r["type"] == "shelter"));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (server, store) = server().await;
        let disaster_id = store.disasters.read().await[0].id;

        server
            .post("/api/resources")
            .json(&json!({
                "disaster_id": disaster_id,
                "name": " ",
                "location_name": "Harlem",
                "type": "food"
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_nearby_requires_coordinates() {
        let (server, _) = server().await;
        server
            .get("/api/resources/nearby")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
