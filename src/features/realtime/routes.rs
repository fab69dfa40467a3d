use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::realtime::handlers;
use crate::features::realtime::services::Aggregator;
use crate::features::realtime::workers::{PollerState, RealtimePoller};
use crate::modules::events::EventHub;

#[derive(Clone)]
pub struct RealtimeState {
    pub aggregator: Arc<Aggregator>,
    pub poller_state: Arc<PollerState>,
    /// Absent when background polling is disabled
    pub poller: Option<Arc<RealtimePoller>>,
    pub events: Arc<EventHub>,
}

/// Create routes for the realtime feature
pub fn routes(state: RealtimeState) -> Router {
    Router::new()
        .route("/api/realtime/aggregate", get(handlers::aggregate))
        .route("/api/realtime/disasters", get(handlers::realtime_disasters))
        .route(
            "/api/realtime/social-media",
            get(handlers::realtime_social_media),
        )
        .route("/api/realtime/weather", get(handlers::realtime_weather))
        .route(
            "/api/realtime/emergency-alerts",
            get(handlers::realtime_emergency_alerts),
        )
        .route("/api/realtime/resources", get(handlers::realtime_resources))
        .route("/api/realtime/status", get(handlers::realtime_status))
        .route("/api/realtime/refresh", post(handlers::refresh))
        .with_state(state)
}
