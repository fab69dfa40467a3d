mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::database::{with_fallback, FallbackRepository};
use crate::core::error::Result;
use crate::features::resources::models::{Resource, ResourceFilter};
use crate::shared::types::{Page, PaginationQuery};

pub use memory::MemoryResourceRepository;
pub use postgres::PgResourceRepository;

/// Resource persistence
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn list(&self, filter: &ResourceFilter, page: &PaginationQuery) -> Result<Page<Resource>>;
    /// Every resource matching `filter`, unpaginated
    async fn all(&self, filter: &ResourceFilter) -> Result<Vec<Resource>>;
    async fn get(&self, id: Uuid) -> Result<Option<Resource>>;
    async fn insert(&self, resource: &Resource) -> Result<Resource>;
    async fn update(&self, resource: &Resource) -> Result<Option<Resource>>;
    async fn delete(&self, id: Uuid) -> Result<Option<Resource>>;
}

pub type FallbackResourceRepository =
    FallbackRepository<PgResourceRepository, MemoryResourceRepository>;

#[async_trait]
impl ResourceRepository for FallbackResourceRepository {
    async fn list(&self, filter: &ResourceFilter, page: &PaginationQuery) -> Result<Page<Resource>> {
        with_fallback("resource", "list", self.primary.list(filter, page), || {
            self.fallback.list(filter, page)
        })
        .await
    }

    async fn all(&self, filter: &ResourceFilter) -> Result<Vec<Resource>> {
        with_fallback("resource", "all", self.primary.all(filter), || {
            self.fallback.all(filter)
        })
        .await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Resource>> {
        with_fallback("resource", "get", self.primary.get(id), || self.fallback.get(id)).await
    }

    async fn insert(&self, resource: &Resource) -> Result<Resource> {
        with_fallback("resource", "insert", self.primary.insert(resource), || {
            self.fallback.insert(resource)
        })
        .await
    }

    async fn update(&self, resource: &Resource) -> Result<Option<Resource>> {
        with_fallback("resource", "update", self.primary.update(resource), || {
            self.fallback.update(resource)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Resource>> {
        with_fallback("resource", "delete", self.primary.delete(id), || {
            self.fallback.delete(id)
        })
        .await
    }
}
