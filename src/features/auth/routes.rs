use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;

pub fn routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/me", get(handlers::get_me))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::core::config::AuthConfig;

    fn server() -> TestServer {
        let service = Arc::new(AuthService::new(&AuthConfig {
            token_secret: "route-secret".to_string(),
            token_ttl: Duration::from_secs(600),
        }));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_login_then_me_with_bearer() {
        let server = server();

        let response = server
            .post("/api/auth/login")
            .json(&json!({"username": "netrunnerX", "password": "password123"}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        let token = body["data"]["access_token"].as_str().unwrap().to_string();

        let me: Value = server
            .get("/api/auth/me")
            .add_header(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
            )
            .await
            .json();
        assert_eq!(me["data"]["username"], "netrunnerX");
        assert_eq!(me["data"]["authenticated"], true);
    }

    #[tokio::test]
    async fn test_login_failures() {
        let server = server();

        server
            .post("/api/auth/login")
            .json(&json!({"username": "netrunnerX", "password": "nope"}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        server
            .post("/api/auth/login")
            .json(&json!({"username": "", "password": "x"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_me_falls_back_to_user_header() {
        let server = server();

        let default_user: Value = server.get("/api/auth/me").await.json();
        assert_eq!(default_user["data"]["id"], "netrunnerX");
        assert_eq!(default_user["data"]["authenticated"], false);

        let named: Value = server
            .get("/api/auth/me")
            .add_header(
                HeaderName::from_static("x-user-id"),
                HeaderValue::from_static("volunteer42"),
            )
            .await
            .json();
        assert_eq!(named["data"]["id"], "volunteer42");
        assert_eq!(named["data"]["role"], "contributor");

        server
            .get("/api/auth/me")
            .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer garbage"))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
