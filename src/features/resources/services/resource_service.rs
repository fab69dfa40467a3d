use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::disasters::repositories::DisasterRepository;
use crate::features::resources::dtos::{
    CreateResourceDto, ResourceListQuery, ResourceNearbyQuery, ResourceResponseDto,
    ResourceStatisticsDto, UpdateResourceDto,
};
use crate::features::resources::models::{Resource, ResourceFilter};
use crate::features::resources::repositories::ResourceRepository;
use crate::modules::events::{EventHub, EventKind};
use crate::modules::geocoding::GeocodingService;
use crate::shared::constants::{DEFAULT_NEARBY_RADIUS_M, DEFAULT_PAGE_SIZE};
use crate::shared::geo::Coordinates;
use crate::shared::types::{Page, PaginationQuery};
use crate::shared::validation::valid_coordinates;

/// Service for relief resources (shelters, hospitals, supplies)
pub struct ResourceService {
    repository: Arc<dyn ResourceRepository>,
    disasters: Arc<dyn DisasterRepository>,
    geocoder: Arc<GeocodingService>,
    events: Arc<EventHub>,
}

/// Centre and radius from optional query parameters; both coordinates are needed
fn proximity(
    lat: Option<f64>,
    lng: Option<f64>,
    radius: Option<f64>,
) -> Result<Option<(Coordinates, f64)>> {
    let Some(point) = Coordinates::from_parts(lat, lng) else {
        return Ok(None);
    };
    if !valid_coordinates(point.lat, point.lng) {
        return Err(AppError::Validation("Invalid coordinates".to_string()));
    }
    let radius = radius.unwrap_or(DEFAULT_NEARBY_RADIUS_M);
    if !(radius > 0.0) {
        return Err(AppError::Validation("Radius must be positive".to_string()));
    }
    Ok(Some((point, radius)))
}

impl ResourceService {
    pub fn new(
        repository: Arc<dyn ResourceRepository>,
        disasters: Arc<dyn DisasterRepository>,
        geocoder: Arc<GeocodingService>,
        events: Arc<EventHub>,
    ) -> Self {
        Self {
            repository,
            disasters,
            geocoder,
            events,
        }
    }

    pub async fn list(&self, query: &ResourceListQuery) -> Result<Page<Resource>> {
        let filter = ResourceFilter {
            disaster_id: query.disaster_id,
            resource_type: query.resource_type,
            available: query.available,
            near: proximity(query.lat, query.lng, query.radius)?,
        };
        let page = PaginationQuery::new(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        );
        self.repository.list(&filter, &page).await
    }

    /// Resources around a point. The in-memory store does not apply the radius.
    pub async fn nearby(&self, query: &ResourceNearbyQuery) -> Result<Vec<Resource>> {
        let filter = ResourceFilter {
            disaster_id: query.disaster_id,
            resource_type: query.resource_type,
            available: None,
            near: proximity(Some(query.lat), Some(query.lng), query.radius)?,
        };
        self.repository.all(&filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Resource> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resource {} not found", id)))
    }

    pub async fn create(&self, dto: CreateResourceDto) -> Result<Resource> {
        if self.disasters.get(dto.disaster_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Disaster {} not found",
                dto.disaster_id
            )));
        }

        let location_name = dto.location_name.trim().to_string();
        let coordinates = match Coordinates::from_parts(dto.lat, dto.lng) {
            Some(c) => Some(c),
            None => self
                .geocoder
                .forward(&location_name)
                .await
                .map(|r| r.coordinates),
        };

        let resource = Resource {
            id: Uuid::new_v4(),
            disaster_id: dto.disaster_id,
            name: dto.name.trim().to_string(),
            location_name,
            lat: coordinates.map(|c| c.lat),
            lng: coordinates.map(|c| c.lng),
            resource_type: dto.resource_type,
            capacity: dto.capacity,
            available: dto.available,
            created_at: Utc::now(),
        };

        let created = self.repository.insert(&resource).await?;
        tracing::info!(
            "Resource created: {} ({}) for disaster {}",
            created.id,
            created.resource_type,
            created.disaster_id
        );
        self.publish("create", &created);
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, dto: UpdateResourceDto) -> Result<Resource> {
        let mut resource = self.get(id).await?;

        if let Some(name) = dto.name {
            resource.name = name.trim().to_string();
        }
        if let Some(resource_type) = dto.resource_type {
            resource.resource_type = resource_type;
        }
        if let Some(capacity) = dto.capacity {
            resource.capacity = Some(capacity);
        }
        if let Some(available) = dto.available {
            resource.available = available;
        }

        let explicit = Coordinates::from_parts(dto.lat, dto.lng);
        if let Some(name) = dto.location_name.map(|n| n.trim().to_string()) {
            if name != resource.location_name && explicit.is_none() {
                let geocoded = self.geocoder.forward(&name).await.map(|r| r.coordinates);
                resource.lat = geocoded.map(|c| c.lat);
                resource.lng = geocoded.map(|c| c.lng);
            }
            resource.location_name = name;
        }
        if let Some(c) = explicit {
            resource.lat = Some(c.lat);
            resource.lng = Some(c.lng);
        }

        let updated = self
            .repository
            .update(&resource)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resource {} not found", id)))?;
        self.publish("update", &updated);
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resource {} not found", id)))?;
        tracing::info!("Resource deleted: {}", id);

        self.events.publish_to_room(
            EventKind::ResourcesUpdated,
            deleted.disaster_id,
            &json!({ "action": "delete", "id": deleted.id }),
        );
        Ok(())
    }

    pub async fn statistics(&self, disaster_id: Option<Uuid>) -> Result<ResourceStatisticsDto> {
        let all = self
            .repository
            .all(&ResourceFilter {
                disaster_id,
                ..Default::default()
            })
            .await?;

        let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
        for resource in &all {
            *by_type.entry(resource.resource_type.to_string()).or_default() += 1;
        }

        Ok(ResourceStatisticsDto {
            total: all.len(),
            available: all.iter().filter(|r| r.available).count(),
            total_capacity: all.iter().filter_map(|r| r.capacity).map(i64::from).sum(),
            by_type,
        })
    }

    fn publish(&self, action: &str, resource: &Resource) {
        self.events.publish_to_room(
            EventKind::ResourcesUpdated,
            resource.disaster_id,
            &json!({
                "action": action,
                "resource": ResourceResponseDto::from(resource.clone()),
            }),
        );
    }
}
