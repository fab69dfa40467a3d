use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::geocode::handlers;
use crate::modules::ai::AiService;
use crate::modules::geocoding::GeocodingService;

#[derive(Clone)]
pub struct GeocodeState {
    pub ai: Arc<AiService>,
    pub geocoder: Arc<GeocodingService>,
}

/// Create routes for the geocode feature
pub fn routes(ai: Arc<AiService>, geocoder: Arc<GeocodingService>) -> Router {
    Router::new()
        .route("/api/geocode", post(handlers::geocode))
        .route("/api/geocode/reverse", get(handlers::reverse_geocode))
        .with_state(GeocodeState { ai, geocoder })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::shared::test_helpers::TestContext;

    fn server() -> TestServer {
        let ctx = TestContext::new();
        TestServer::new(routes(ctx.ai.clone(), ctx.geocoder.clone())).unwrap()
    }

    #[tokio::test]
    async fn test_extracts_location_from_description() {
        let body: Value = server()
            .post("/api/geocode")
            .json(&json!({"description": "Flooding reported near Brooklyn Bridge"}))
            .await
            .json();

        assert_eq!(body["data"]["location_name"], "Brooklyn Bridge");
        assert_eq!(body["data"]["extraction"]["method"], "heuristic");
        // Geocoder is unreachable in tests
        assert!(body["data"]["coordinates"].is_null());
    }

    #[tokio::test]
    async fn test_nothing_to_geocode() {
        server()
            .post("/api/geocode")
            .json(&json!({}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reverse_rejects_bad_coordinates() {
        server()
            .get("/api/geocode/reverse?lat=95&lng=0")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
