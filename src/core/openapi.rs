use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers, models as auth_models};
use crate::features::disasters::{
    dtos as disasters_dtos, handlers as disasters_handlers, models as disasters_models,
};
use crate::features::geocode::{dtos as geocode_dtos, handlers as geocode_handlers};
use crate::features::health::{dtos as health_dtos, handlers as health_handlers};
use crate::features::official_updates::{
    dtos as official_updates_dtos, handlers as official_updates_handlers,
};
use crate::features::realtime::{
    dtos as realtime_dtos, handlers as realtime_handlers, models as realtime_models,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::resources::{
    dtos as resources_dtos, handlers as resources_handlers, models as resources_models,
};
use crate::features::social_media::{dtos as social_media_dtos, handlers as social_media_handlers};
use crate::features::verification::{
    dtos as verification_dtos, handlers as verification_handlers,
};
use crate::features::websocket::handlers as websocket_handlers;
use crate::modules::{ai, cache, events, feeds, geocoding, social};
use crate::shared::geo::Coordinates;
use crate::shared::types::{ApiResponse, Pagination, Priority};

#[derive(OpenApi)]
#[openapi(
    paths(
        // System
        health_handlers::health_check,
        health_handlers::cache_stats,
        // Auth
        auth_handlers::login,
        auth_handlers::get_me,
        // Disasters
        disasters_handlers::list_disasters,
        disasters_handlers::create_disaster,
        disasters_handlers::nearby_disasters,
        disasters_handlers::disaster_statistics,
        disasters_handlers::get_disaster,
        disasters_handlers::update_disaster,
        disasters_handlers::delete_disaster,
        // Reports
        reports_handlers::list_reports,
        reports_handlers::create_report,
        reports_handlers::report_statistics,
        reports_handlers::get_report,
        reports_handlers::update_report,
        reports_handlers::delete_report,
        reports_handlers::verify_report,
        // Resources
        resources_handlers::list_resources,
        resources_handlers::create_resource,
        resources_handlers::nearby_resources,
        resources_handlers::resource_statistics,
        resources_handlers::get_resource,
        resources_handlers::update_resource,
        resources_handlers::delete_resource,
        // Geocoding
        geocode_handlers::geocode,
        geocode_handlers::reverse_geocode,
        // Verification
        verification_handlers::verify_image,
        // Social media
        social_media_handlers::search_posts,
        social_media_handlers::urgent_posts,
        social_media_handlers::official_posts,
        social_media_handlers::trending_posts,
        social_media_handlers::create_post,
        // Official updates
        official_updates_handlers::list_official_updates,
        // Realtime
        realtime_handlers::aggregate,
        realtime_handlers::realtime_disasters,
        realtime_handlers::realtime_social_media,
        realtime_handlers::realtime_weather,
        realtime_handlers::realtime_emergency_alerts,
        realtime_handlers::realtime_resources,
        realtime_handlers::realtime_status,
        realtime_handlers::refresh,
        // WebSocket
        websocket_handlers::ws_handler,
    ),
    components(
        schemas(
            // Shared
            Pagination,
            Priority,
            Coordinates,
            // System
            health_dtos::HealthResponseDto,
            health_dtos::FeatureFlagsDto,
            cache::CacheStats,
            // Auth
            auth_dtos::LoginRequestDto,
            auth_dtos::LoginResponseDto,
            auth_dtos::AuthUserDto,
            auth_models::UserRole,
            ApiResponse<auth_dtos::LoginResponseDto>,
            ApiResponse<auth_dtos::AuthUserDto>,
            // Disasters
            disasters_dtos::DisasterResponseDto,
            disasters_dtos::CreateDisasterDto,
            disasters_dtos::UpdateDisasterDto,
            disasters_dtos::DisasterStatisticsDto,
            disasters_models::AuditAction,
            disasters_models::AuditEntry,
            ApiResponse<disasters_dtos::DisasterResponseDto>,
            ApiResponse<Vec<disasters_dtos::DisasterResponseDto>>,
            // Reports
            reports_dtos::ReportResponseDto,
            reports_dtos::CreateReportDto,
            reports_dtos::UpdateReportDto,
            reports_dtos::VerifyReportDto,
            reports_dtos::ReportStatisticsDto,
            reports_dtos::ReportVerificationDto,
            reports_models::VerificationStatus,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            // Resources
            resources_dtos::ResourceResponseDto,
            resources_dtos::CreateResourceDto,
            resources_dtos::UpdateResourceDto,
            resources_dtos::ResourceStatisticsDto,
            resources_models::ResourceType,
            ApiResponse<resources_dtos::ResourceResponseDto>,
            ApiResponse<Vec<resources_dtos::ResourceResponseDto>>,
            // Geocoding
            geocode_dtos::GeocodeRequestDto,
            geocode_dtos::GeocodeResponseDto,
            geocode_dtos::ReverseGeocodeResponseDto,
            geocoding::GeocodeResult,
            // Verification
            verification_dtos::VerifyImageDto,
            verification_dtos::VerifyImageResponseDto,
            ai::ImageVerification,
            ai::LocationExtraction,
            ai::ExtractionMethod,
            // Social media
            social_media_dtos::SocialFeedResponseDto,
            social_media_dtos::CreatePostDto,
            social_media_dtos::CreatePostResponseDto,
            social::SocialMediaPost,
            social::Engagement,
            social::PostOrigin,
            // Official updates
            official_updates_dtos::OfficialUpdateDto,
            official_updates_dtos::OfficialUpdatesResponseDto,
            official_updates_dtos::UpdateSource,
            // Realtime
            realtime_dtos::RefreshResponseDto,
            realtime_models::RealtimeSnapshot,
            realtime_models::PollerStatus,
            realtime_models::SourceStatus,
            feeds::WeatherAlert,
            feeds::EmergencyAlert,
            feeds::Shelter,
            // WebSocket events
            events::EventKind,
            events::ServerEvent,
        )
    ),
    tags(
        (name = "system", description = "Health and cache statistics"),
        (name = "auth", description = "Mock authentication"),
        (name = "disasters", description = "Disaster records"),
        (name = "reports", description = "Citizen reports attached to a disaster"),
        (name = "resources", description = "Shelters, hospitals and supply points"),
        (name = "geocode", description = "Location extraction and geocoding"),
        (name = "verification", description = "AI image verification"),
        (name = "social-media", description = "Social media monitoring"),
        (name = "official-updates", description = "Official alerts and announcements"),
        (name = "realtime", description = "Aggregated live data"),
        (name = "events", description = "WebSocket event stream with per-disaster rooms"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Disaster Response API",
        version = "0.1.0",
        description = "Disaster response coordination backend",
    )
)]
pub struct ApiDoc;

/// Adds the bearer scheme used by mock session tokens
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_feature() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/disasters/{id}",
            "/api/reports/{id}/verify",
            "/api/resources/nearby",
            "/api/verify/image",
            "/api/social-media/urgent",
            "/api/official-updates",
            "/api/realtime/refresh",
            "/api/auth/login",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
