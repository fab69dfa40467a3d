use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::DisasterRepository;
use crate::core::error::Result;
use crate::features::disasters::models::{AuditEntry, Disaster, DisasterFilter};
use crate::features::fixtures::FixtureStore;
use crate::shared::geo::Coordinates;
use crate::shared::types::{Page, PaginationQuery};

/// Disasters held in the shared fixture store
pub struct MemoryDisasterRepository {
    store: Arc<FixtureStore>,
}

impl MemoryDisasterRepository {
    pub fn new(store: Arc<FixtureStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DisasterRepository for MemoryDisasterRepository {
    async fn list(&self, filter: &DisasterFilter, page: &PaginationQuery) -> Result<Page<Disaster>> {
        let disasters = self.store.disasters.read().await;
        let mut matching: Vec<Disaster> = disasters
            .iter()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(Page {
            total: matching.len() as i64,
            items: page.apply(&matching),
        })
    }

    async fn all(&self) -> Result<Vec<Disaster>> {
        let mut all = self.store.disasters.read().await.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Disaster>> {
        let disasters = self.store.disasters.read().await;
        Ok(disasters.iter().find(|d| d.id == id).cloned())
    }

    async fn insert(&self, disaster: &Disaster) -> Result<Disaster> {
        self.store.disasters.write().await.push(disaster.clone());
        Ok(disaster.clone())
    }

    async fn update(&self, disaster: &Disaster, audit: &AuditEntry) -> Result<Option<Disaster>> {
        let mut disasters = self.store.disasters.write().await;
        let Some(existing) = disasters.iter_mut().find(|d| d.id == disaster.id) else {
            return Ok(None);
        };

        let mut trail = std::mem::take(&mut existing.audit_trail.0);
        trail.push(audit.clone());

        *existing = disaster.clone();
        existing.audit_trail.0 = trail;
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut disasters = self.store.disasters.write().await;
        let before = disasters.len();
        disasters.retain(|d| d.id != id);
        if disasters.len() == before {
            return Ok(false);
        }

        // Same lock order everywhere: disasters, reports, resources
        self.store.reports.write().await.retain(|r| r.disaster_id != id);
        self.store.resources.write().await.retain(|r| r.disaster_id != id);
        Ok(true)
    }

    async fn nearby(&self, point: Coordinates, radius_m: f64) -> Result<Vec<Disaster>> {
        let disasters = self.store.disasters.read().await;
        Ok(disasters
            .iter()
            .filter(|d| {
                d.coordinates()
                    .is_some_and(|c| c.distance_to(&point) <= radius_m)
            })
            .cloned()
            .collect())
    }
}
