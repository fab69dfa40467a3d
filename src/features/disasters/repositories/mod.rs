mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::database::{with_fallback, FallbackRepository};
use crate::core::error::Result;
use crate::features::disasters::models::{AuditEntry, Disaster, DisasterFilter};
use crate::shared::geo::Coordinates;
use crate::shared::types::{Page, PaginationQuery};

pub use memory::MemoryDisasterRepository;
pub use postgres::PgDisasterRepository;

/// Disaster persistence
#[async_trait]
pub trait DisasterRepository: Send + Sync {
    async fn list(&self, filter: &DisasterFilter, page: &PaginationQuery) -> Result<Page<Disaster>>;
    async fn all(&self) -> Result<Vec<Disaster>>;
    async fn get(&self, id: Uuid) -> Result<Option<Disaster>>;
    async fn insert(&self, disaster: &Disaster) -> Result<Disaster>;
    /// Overwrite the mutable fields and append `audit` to the trail
    async fn update(&self, disaster: &Disaster, audit: &AuditEntry) -> Result<Option<Disaster>>;
    /// Delete the disaster and its reports and resources
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn nearby(&self, point: Coordinates, radius_m: f64) -> Result<Vec<Disaster>>;
}

pub type FallbackDisasterRepository =
    FallbackRepository<PgDisasterRepository, MemoryDisasterRepository>;

#[async_trait]
impl DisasterRepository for FallbackDisasterRepository {
    async fn list(&self, filter: &DisasterFilter, page: &PaginationQuery) -> Result<Page<Disaster>> {
        with_fallback("disaster", "list", self.primary.list(filter, page), || {
            self.fallback.list(filter, page)
        })
        .await
    }

    async fn all(&self) -> Result<Vec<Disaster>> {
        with_fallback("disaster", "all", self.primary.all(), || self.fallback.all()).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Disaster>> {
        with_fallback("disaster", "get", self.primary.get(id), || self.fallback.get(id)).await
    }

    async fn insert(&self, disaster: &Disaster) -> Result<Disaster> {
        with_fallback("disaster", "insert", self.primary.insert(disaster), || {
            self.fallback.insert(disaster)
        })
        .await
    }

    async fn update(&self, disaster: &Disaster, audit: &AuditEntry) -> Result<Option<Disaster>> {
        with_fallback("disaster", "update", self.primary.update(disaster, audit), || {
            self.fallback.update(disaster, audit)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        with_fallback("disaster", "delete", self.primary.delete(id), || {
            self.fallback.delete(id)
        })
        .await
    }

    async fn nearby(&self, point: Coordinates, radius_m: f64) -> Result<Vec<Disaster>> {
        with_fallback("disaster", "nearby", self.primary.nearby(point, radius_m), || {
            self.fallback.nearby(point, radius_m)
        })
        .await
    }
}
