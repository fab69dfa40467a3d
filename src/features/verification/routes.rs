use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::reports::ReportService;
use crate::features::verification::handlers;
use crate::modules::ai::AiService;

#[derive(Clone)]
pub struct VerificationState {
    pub ai: Arc<AiService>,
    pub reports: Arc<ReportService>,
}

/// Create routes for the verification feature
pub fn routes(ai: Arc<AiService>, reports: Arc<ReportService>) -> Router {
    Router::new()
        .route("/api/verify/image", post(handlers::verify_image))
        .with_state(VerificationState { ai, reports })
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

    async fn server() -> (TestServer, Arc<FixtureStore>) {
        let ctx = TestContext::new();
        let store = Arc::new(FixtureStore::seeded());
        let reports = Arc::new(ReportService::new(
            Arc::new(MemoryReportRepository::new(store.clone())),
            Arc::new(MemoryDisasterRepository::new(store.clone())),
            ctx.ai.clone(),
            ctx.events.clone(),
        ));
        (TestServer::new(routes(ctx.ai.clone(), reports)).unwrap(), store)
    }

    #[tokio::test]
    async fn test_standalone_verification_fails_open() {
        let (server, _) = server().await;
        let response = server
            .post("/api/verify/image")
            .json(&json!({"image_url": "https://example.com/smoke.jpg"}))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["verification"]["authentic"], true);
        assert_eq!(body["data"]["verification"]["confidence"], 0.5);
        assert!(body["data"].get("report").is_none());
    }

    #[tokio::test]
    async fn test_verification_updates_report() {
        let (server, store) = server().await;
        let report_id = store.reports.read().await[0].id;

        let body: Value = server
            .post("/api/verify/image")
            .json(&json!({
                "image_url": "https://example.com/smoke.jpg",
                "report_id": report_id
            }))
            .await
            .json();
        assert_eq!(body["data"]["report"]["verification_status"], "verified");
    }

    #[tokio::test]
    async fn test_unknown_report() {
        let (server, _) = server().await;
        server
            .post("/api/verify/image")
            .json(&json!({
                "image_url": "https://example.com/smoke.jpg",
                "report_id": uuid::Uuid::new_v4()
            }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
