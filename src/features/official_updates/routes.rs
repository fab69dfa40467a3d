use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::official_updates::handlers;
use crate::features::official_updates::services::OfficialUpdateService;

/// Create routes for the official updates feature
pub fn routes(service: Arc<OfficialUpdateService>) -> Router {
    Router::new()
        .route("/api/official-updates", get(handlers::list_official_updates))
        .with_state(service)
}
