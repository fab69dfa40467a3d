use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::ResourceRepository;
use crate::core::error::Result;
use crate::features::fixtures::FixtureStore;
use crate::features::resources::models::{Resource, ResourceFilter};
use crate::shared::types::{Page, PaginationQuery};

/// Resources held in the shared fixture store.
///
/// Distance filtering is not applied here: a radius query returns every
/// resource matching the remaining filters.
pub struct MemoryResourceRepository {
    store: Arc<FixtureStore>,
}

impl MemoryResourceRepository {
    pub fn new(store: Arc<FixtureStore>) -> Self {
        Self { store }
    }

    async fn matching(&self, filter: &ResourceFilter) -> Vec<Resource> {
        let resources = self.store.resources.read().await;
        let mut matching: Vec<Resource> = resources
            .iter()
            .filter(|r| filter.matches_attributes(r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }
}

#[async_trait]
impl ResourceRepository for MemoryResourceRepository {
    async fn list(&self, filter: &ResourceFilter, page: &PaginationQuery) -> Result<Page<Resource>> {
        let matching = self.matching(filter).await;
        Ok(Page {
            total: matching.len() as i64,
            items: page.apply(&matching),
        })
    }

    async fn all(&self, filter: &ResourceFilter) -> Result<Vec<Resource>> {
        Ok(self.matching(filter).await)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Resource>> {
        let resources = self.store.resources.read().await;
        Ok(resources.iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, resource: &Resource) -> Result<Resource> {
        self.store.resources.write().await.push(resource.clone());
        Ok(resource.clone())
    }

    async fn update(&self, resource: &Resource) -> Result<Option<Resource>> {
        let mut resources = self.store.resources.write().await;
        Ok(resources.iter_mut().find(|r| r.id == resource.id).map(|existing| {
            *existing = resource.clone();
            existing.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Resource>> {
        let mut resources = self.store.resources.write().await;
        let position = resources.iter().position(|r| r.id == id);
        Ok(position.map(|i| resources.remove(i)))
    }
}
