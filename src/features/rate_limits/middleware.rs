use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::core::error::AppError;
use crate::features::rate_limits::services::RateLimiter;
use crate::shared::constants::RATE_LIMIT_MESSAGE;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Client address: first `X-Forwarded-For` entry, else the socket peer
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(req.headers(), peer);

    let decision = limiter.check(&ip).await;
    let mut response = if decision.allowed {
        next.run(req).await
    } else {
        tracing::warn!(client_ip = %ip, "Rate limit exceeded");
        AppError::RateLimitExceeded(RATE_LIMIT_MESSAGE.to_string()).into_response()
    };

    let headers = response.headers_mut();
    headers.insert("ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert(
        "ratelimit-reset",
        HeaderValue::from(decision.reset_after.as_secs()),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::{
        http::{HeaderName, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::core::config::RateLimitConfig;

    fn server(max_requests: usize) -> TestServer {
        let limiter = Arc::new(RateLimiter::new(&RateLimitConfig {
            window: Duration::from_secs(900),
            max_requests,
        }));
        let app = Router::new()
            .route("/api/ping", get(|| async { "pong" }))
            .layer(from_fn_with_state(limiter, rate_limit_middleware));
        TestServer::new(app).unwrap()
    }

    fn forwarded(ip: &'static str) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static(FORWARDED_FOR),
            HeaderValue::from_static(ip),
        )
    }

    #[test]
    fn test_client_ip_prefers_first_forwarded_entry() {
        let mut headers = HeaderMap::new();
        let peer: SocketAddr = "192.168.1.9:4000".parse().unwrap();
        assert_eq!(client_ip(&headers, Some(peer)), "192.168.1.9");
        assert_eq!(client_ip(&headers, None), "unknown");

        headers.insert(FORWARDED_FOR, HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_ip(&headers, Some(peer)), "203.0.113.7");
    }

    #[tokio::test]
    async fn test_request_over_budget_gets_429() {
        let server = server(2);

        for _ in 0..2 {
            let (name, value) = forwarded("198.51.100.1");
            let response = server.get("/api/ping").add_header(name, value).await;
            response.assert_status_ok();
        }

        let (name, value) = forwarded("198.51.100.1");
        let response = server.get("/api/ping").add_header(name, value).await;
        response.assert_status(StatusCode::TOO_MANY_REQUESTS);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], RATE_LIMIT_MESSAGE);
        assert_eq!(response.header("ratelimit-remaining"), "0");

        let (name, value) = forwarded("198.51.100.2");
        server
            .get("/api/ping")
            .add_header(name, value)
            .await
            .assert_status_ok();
    }
}
