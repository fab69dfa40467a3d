use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::disasters::dtos::{
    CreateDisasterDto, DisasterListQuery, DisasterResponseDto, DisasterStatisticsDto,
    UpdateDisasterDto,
};
use crate::features::disasters::models::{AuditAction, AuditEntry, Disaster, DisasterFilter};
use crate::features::disasters::repositories::DisasterRepository;
use crate::modules::ai::AiService;
use crate::modules::events::{EventHub, EventKind};
use crate::modules::geocoding::GeocodingService;
use crate::shared::constants::{DEFAULT_NEARBY_RADIUS_M, UNKNOWN_LOCATION};
use crate::shared::correlation::DisasterRef;
use crate::shared::geo::Coordinates;
use crate::shared::types::{Page, PaginationQuery};
use crate::shared::validation::normalize_tags;

/// Service for managing disasters
pub struct DisasterService {
    repository: Arc<dyn DisasterRepository>,
    ai: Arc<AiService>,
    geocoder: Arc<GeocodingService>,
    events: Arc<EventHub>,
}

impl DisasterService {
    pub fn new(
        repository: Arc<dyn DisasterRepository>,
        ai: Arc<AiService>,
        geocoder: Arc<GeocodingService>,
        events: Arc<EventHub>,
    ) -> Self {
        Self {
            repository,
            ai,
            geocoder,
            events,
        }
    }

    pub fn repository(&self) -> Arc<dyn DisasterRepository> {
        Arc::clone(&self.repository)
    }

    /// List disasters with filters and pagination
    pub async fn list(&self, query: &DisasterListQuery) -> Result<Page<Disaster>> {
        let filter = DisasterFilter {
            tag: non_empty(&query.tag).map(|t| t.to_lowercase()),
            owner_id: non_empty(&query.owner_id),
            search: non_empty(&query.search),
        };
        let page = PaginationQuery::new(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(crate::shared::constants::DEFAULT_PAGE_SIZE),
        );
        self.repository.list(&filter, &page).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Disaster> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Disaster {} not found", id)))
    }

    /// Lightweight references used for correlating posts and feed items
    pub async fn refs(&self) -> Result<Vec<DisasterRef>> {
        let all = self.repository.all().await?;
        Ok(all.iter().map(Disaster::to_ref).collect())
    }

    /// Create a disaster.
    ///
    /// A missing location name is extracted from the description, and missing
    /// coordinates are geocoded from the location name.
    pub async fn create(&self, dto: CreateDisasterDto, user_id: &str) -> Result<Disaster> {
        let location_name = match non_empty(&dto.location_name) {
            Some(name) => name,
            None => self.derive_location_name(&dto.description).await,
        };

        let coordinates = match Coordinates::from_parts(dto.lat, dto.lng) {
            Some(c) => Some(c),
            None => self.geocode(&location_name).await,
        };

        let now = Utc::now();
        let disaster = Disaster {
            id: Uuid::new_v4(),
            title: dto.title.trim().to_string(),
            location_name,
            lat: coordinates.map(|c| c.lat),
            lng: coordinates.map(|c| c.lng),
            description: dto.description.trim().to_string(),
            tags: normalize_tags(&dto.tags),
            owner_id: user_id.to_string(),
            audit_trail: sqlx::types::Json(vec![AuditEntry::new(
                AuditAction::Create,
                user_id,
                None,
            )]),
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.insert(&disaster).await?;
        tracing::info!(
            "Disaster created: {} ({}) by {}",
            created.id,
            created.location_name,
            user_id
        );

        self.events.publish_global(
            EventKind::DisasterUpdated,
            &json!({
                "action": "create",
                "disaster": DisasterResponseDto::from(created.clone()),
            }),
        );
        Ok(created)
    }

    /// Apply a partial update and append an audit entry naming the changed fields
    pub async fn update(&self, id: Uuid, dto: UpdateDisasterDto, user_id: &str) -> Result<Disaster> {
        let existing = self.get(id).await?;
        let mut updated = existing.clone();
        let mut changed: Vec<&str> = Vec::new();

        if let Some(title) = dto.title.as_deref().map(str::trim) {
            if title != existing.title {
                updated.title = title.to_string();
                changed.push("title");
            }
        }
        if let Some(description) = dto.description.as_deref().map(str::trim) {
            if description != existing.description {
                updated.description = description.to_string();
                changed.push("description");
            }
        }
        if let Some(tags) = dto.tags.as_ref().map(|t| normalize_tags(t)) {
            if tags != existing.tags {
                updated.tags = tags;
                changed.push("tags");
            }
        }

        let location_changed = match dto.location_name.as_deref().map(str::trim) {
            Some(name) if name != existing.location_name => {
                updated.location_name = name.to_string();
                changed.push("location_name");
                true
            }
            _ => false,
        };

        let explicit = Coordinates::from_parts(dto.lat, dto.lng);
        let coordinates = match explicit {
            Some(c) => Some(c),
            None if location_changed => self.geocode(&updated.location_name).await,
            None => existing.coordinates(),
        };
        if coordinates != existing.coordinates() {
            updated.lat = coordinates.map(|c| c.lat);
            updated.lng = coordinates.map(|c| c.lng);
            changed.push("location");
        }

        if changed.is_empty() {
            return Ok(existing);
        }

        updated.updated_at = Utc::now();
        let audit = AuditEntry::new(
            AuditAction::Update,
            user_id,
            Some(format!("Updated fields: {}", changed.join(", "))),
        );

        let saved = self
            .repository
            .update(&updated, &audit)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Disaster {} not found", id)))?;
        tracing::info!("Disaster updated: {} ({})", id, changed.join(", "));

        self.events.publish_global(
            EventKind::DisasterUpdated,
            &json!({
                "action": "update",
                "disaster": DisasterResponseDto::from(saved.clone()),
            }),
        );
        Ok(saved)
    }

    /// Delete a disaster together with its reports and resources
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound(format!("Disaster {} not found", id)));
        }
        tracing::info!("Disaster deleted: {}", id);

        self.events.publish_global(
            EventKind::DisasterUpdated,
            &json!({ "action": "delete", "id": id }),
        );
        Ok(())
    }

    /// Disasters within `radius_m` metres (default 10 km) of a point
    pub async fn nearby(&self, lat: f64, lng: f64, radius_m: Option<f64>) -> Result<Vec<Disaster>> {
        if !crate::shared::validation::valid_coordinates(lat, lng) {
            return Err(AppError::Validation("Invalid coordinates".to_string()));
        }
        let radius = radius_m.unwrap_or(DEFAULT_NEARBY_RADIUS_M);
        if !(radius > 0.0) {
            return Err(AppError::Validation("Radius must be positive".to_string()));
        }
        self.repository
            .nearby(Coordinates::new(lat, lng), radius)
            .await
    }

    pub async fn statistics(&self) -> Result<DisasterStatisticsDto> {
        let all = self.repository.all().await?;
        let since = Utc::now() - Duration::hours(24);

        let mut by_tag: BTreeMap<String, usize> = BTreeMap::new();
        for tag in all.iter().flat_map(|d| d.tags.iter()) {
            *by_tag.entry(tag.clone()).or_default() += 1;
        }

        Ok(DisasterStatisticsDto {
            total: all.len(),
            with_coordinates: all.iter().filter(|d| d.coordinates().is_some()).count(),
            created_last_24h: all.iter().filter(|d| d.created_at >= since).count(),
            by_tag,
        })
    }

    async fn derive_location_name(&self, description: &str) -> String {
        let extraction = self.ai.extract_location(description).await;
        match extraction.location_name {
            Some(name) if !name.trim().is_empty() => {
                tracing::debug!(
                    "Derived location '{}' via {:?} ({:.2})",
                    name,
                    extraction.method,
                    extraction.confidence
                );
                name
            }
            _ => UNKNOWN_LOCATION.to_string(),
        }
    }

    async fn geocode(&self, location_name: &str) -> Option<Coordinates> {
        if location_name == UNKNOWN_LOCATION {
            return None;
        }
        self.geocoder
            .forward(location_name)
            .await
            .map(|r| r.coordinates)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::disasters::repositories::MemoryDisasterRepository;
    use crate::features::fixtures::FixtureStore;
    use crate::shared::test_helpers::TestContext;

    fn service(ctx: &TestContext) -> DisasterService {
        DisasterService::new(
            Arc::new(MemoryDisasterRepository::new(Arc::new(FixtureStore::empty()))),
            ctx.ai.clone(),
            ctx.geocoder.clone(),
            ctx.events.clone(),
        )
    }

    fn create_dto(title: &str, description: &str) -> CreateDisasterDto {
        CreateDisasterDto {
            title: title.to_string(),
            location_name: None,
            description: description.to_string(),
            tags: vec!["Flood".to_string(), "flood".to_string()],
            lat: Some(40.7128),
            lng: Some(-74.0060),
        }
    }

    #[tokio::test]
    async fn test_create_derives_location_and_audits() {
        let ctx = TestContext::new();
        let svc = service(&ctx);
        let mut rx = ctx.events.subscribe();

        let created = svc
            .create(create_dto("Test Flood", "River overflow near Main St"), "alice")
            .await
            .unwrap();

        assert_eq!(created.location_name, "Main St");
        assert_eq!(created.tags, vec!["flood".to_string()]);
        assert_eq!(created.owner_id, "alice");
        assert_eq!(created.audit_trail.0.len(), 1);
        assert_eq!(created.audit_trail.0[0].action, AuditAction::Create);

        let event = rx.try_recv().unwrap();
        assert_eq!(event.event, EventKind::DisasterUpdated);
        assert!(event.room.is_none());
        assert_eq!(event.data["action"], "create");
    }

    #[tokio::test]
    async fn test_create_without_place_uses_unknown_location() {
        let ctx = TestContext::new();
        let svc = service(&ctx);

        let created = svc
            .create(create_dto("Storm", "strong wind everywhere"), "alice")
            .await
            .unwrap();
        assert_eq!(created.location_name, UNKNOWN_LOCATION);
    }

    #[tokio::test]
    async fn test_update_records_changed_fields() {
        let ctx = TestContext::new();
        let svc = service(&ctx);
        let created = svc
            .create(create_dto("Test Flood", "River overflow near Main St"), "alice")
            .await
            .unwrap();

        let updated = svc
            .update(
                created.id,
                UpdateDisasterDto {
                    title: Some("Major Flood".to_string()),
                    tags: Some(vec!["flood".to_string()]),
                    ..Default::default()
                },
                "bob",
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Major Flood");
        let trail = &updated.audit_trail.0;
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[1].action, AuditAction::Update);
        assert_eq!(trail[1].user_id, "bob");
        assert_eq!(trail[1].details.as_deref(), Some("Updated fields: title"));
    }

    #[tokio::test]
    async fn test_update_without_changes_keeps_trail() {
        let ctx = TestContext::new();
        let svc = service(&ctx);
        let created = svc
            .create(create_dto("Test Flood", "River overflow near Main St"), "alice")
            .await
            .unwrap();

        let same = svc
            .update(created.id, UpdateDisasterDto::default(), "bob")
            .await
            .unwrap();
        assert_eq!(same.audit_trail.0.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_and_missing() {
        let ctx = TestContext::new();
        let svc = service(&ctx);
        let created = svc
            .create(create_dto("Test Flood", "River overflow near Main St"), "alice")
            .await
            .unwrap();

        svc.delete(created.id).await.unwrap();
        assert!(matches!(svc.get(created.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(svc.delete(created.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_nearby_filters_by_radius() {
        let ctx = TestContext::new();
        let svc = service(&ctx);
        svc.create(create_dto("Test Flood", "River overflow near Main St"), "alice")
            .await
            .unwrap();

        // Lower Manhattan is within 10 km, Philadelphia is not
        assert_eq!(svc.nearby(40.7150, -73.9843, None).await.unwrap().len(), 1);
        assert!(svc.nearby(39.9526, -75.1652, None).await.unwrap().is_empty());
        assert!(svc.nearby(91.0, 0.0, None).await.is_err());
    }

    #[tokio::test]
    async fn test_statistics() {
        let ctx = TestContext::new();
        let svc = service(&ctx);
        svc.create(create_dto("Test Flood", "River overflow near Main St"), "alice")
            .await
            .unwrap();

        let stats = svc.statistics().await.unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.with_coordinates, 1);
        assert_eq!(stats.created_last_24h, 1);
        assert_eq!(stats.by_tag.get("flood"), Some(&1));
    }
}
