mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::database::{with_fallback, FallbackRepository};
use crate::core::error::Result;
use crate::features::reports::models::{Report, ReportFilter, VerificationStatus};
use crate::modules::ai::ImageVerification;
use crate::shared::types::{Page, PaginationQuery};

pub use memory::MemoryReportRepository;
pub use postgres::PgReportRepository;

/// Report persistence
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn list(&self, filter: &ReportFilter, page: &PaginationQuery) -> Result<Page<Report>>;
    async fn all(&self) -> Result<Vec<Report>>;
    async fn get(&self, id: Uuid) -> Result<Option<Report>>;
    async fn insert(&self, report: &Report) -> Result<Report>;
    /// Overwrite content, image and status
    async fn update(&self, report: &Report) -> Result<Option<Report>>;
    async fn set_verification(
        &self,
        id: Uuid,
        status: VerificationStatus,
        verification: &ImageVerification,
    ) -> Result<Option<Report>>;
    async fn delete(&self, id: Uuid) -> Result<Option<Report>>;
}

pub type FallbackReportRepository = FallbackRepository<PgReportRepository, MemoryReportRepository>;

#[async_trait]
impl ReportRepository for FallbackReportRepository {
    async fn list(&self, filter: &ReportFilter, page: &PaginationQuery) -> Result<Page<Report>> {
        with_fallback("report", "list", self.primary.list(filter, page), || {
            self.fallback.list(filter, page)
        })
        .await
    }

    async fn all(&self) -> Result<Vec<Report>> {
        with_fallback("report", "all", self.primary.all(), || self.fallback.all()).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Report>> {
        with_fallback("report", "get", self.primary.get(id), || self.fallback.get(id)).await
    }

    async fn insert(&self, report: &Report) -> Result<Report> {
        with_fallback("report", "insert", self.primary.insert(report), || {
            self.fallback.insert(report)
        })
        .await
    }

    async fn update(&self, report: &Report) -> Result<Option<Report>> {
        with_fallback("report", "update", self.primary.update(report), || {
            self.fallback.update(report)
        })
        .await
    }

    async fn set_verification(
        &self,
        id: Uuid,
        status: VerificationStatus,
        verification: &ImageVerification,
    ) -> Result<Option<Report>> {
        with_fallback(
            "report",
            "verify",
            self.primary.set_verification(id, status, verification),
            || self.fallback.set_verification(id, status, verification),
        )
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Report>> {
        with_fallback("report", "delete", self.primary.delete(id), || {
            self.fallback.delete(id)
        })
        .await
    }
}
