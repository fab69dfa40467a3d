use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route("/api/reports/statistics", get(handlers::report_statistics))
        .route(
            "/api/reports/{id}",
            get(handlers::get_report)
                .put(handlers::update_report)
                .delete(handlers::delete_report),
        )
        .route("/api/reports/{id}/verify", post(handlers::verify_report))
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
    use crate::features::reports::repositories::MemoryReportRepository;
    use crate::shared::test_helpers::TestContext;

    async fn server() -> (TestServer, uuid::Uuid) {
        let ctx = TestContext::new();
        let store = Arc::new(FixtureStore::seeded());
        let disaster_id = store.disasters.read().await[0].id;
        let service = Arc::new(ReportService::new(
            Arc::new(MemoryReportRepository::new(store.clone())),
            Arc::new(MemoryDisasterRepository::new(store)),
            ctx.ai.clone(),
            ctx.events.clone(),
        ));
        (TestServer::new(routes(service)).unwrap(), disaster_id)
    }

    #[tokio::test]
    async fn test_create_filter_and_verify() {
        let (server, disaster_id) = server().await;

        let created = server
            .post("/api/reports")
            .json(&json!({
                "disaster_id": disaster_id,
                "content": "Basement flooded",
                "image_url": "https://example.com/basement.jpg"
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let id = created.json::<Value>()["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let verified = server
            .post(&format!("/api/reports/{}/verify", id))
            .json(&json!({"context": "flooded basement"}))
            .await;
        verified.assert_status_ok();
        let body: Value = verified.json();
        assert_eq!(body["data"]["report"]["verification_status"], "verified");
        assert_eq!(body["data"]["verification"]["is_fallback"], true);

        let list: Value = server
            .get(&format!("/api/reports?disaster_id={}&status=verified", disaster_id))
            .await
            .json();
        let items = list["data"].as_array().unwrap();
        assert!(items.iter().any(|r| r["id"] == id.as_str()));
        assert!(items.iter().all(|r| r["verification_status"] == "verified"));
    }

    #[tokio::test]
    async fn test_invalid_image_url_is_rejected() {
        let (server, disaster_id) = server().await;
        server
            .post("/api/reports")
            .json(&json!({
                "disaster_id": disaster_id,
                "content": "Smoke",
                "image_url": "not a url"
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_statistics() {
        let (server, _) = server().await;
        let body: Value = server.get("/api/reports/statistics").await.json();
        assert!(body["data"]["total"].as_u64().unwrap() > 0);
    }
}
