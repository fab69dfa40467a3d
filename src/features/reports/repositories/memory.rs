use std::sync::Arc;

use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use super::ReportRepository;
use crate::core::error::Result;
use crate::features::fixtures::FixtureStore;
use crate::features::reports::models::{Report, ReportFilter, VerificationStatus};
use crate::modules::ai::ImageVerification;
use crate::shared::types::{Page, PaginationQuery};

pub struct MemoryReportRepository {
    store: Arc<FixtureStore>,
}

impl MemoryReportRepository {
    pub fn new(store: Arc<FixtureStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ReportRepository for MemoryReportRepository {
    async fn list(&self, filter: &ReportFilter, page: &PaginationQuery) -> Result<Page<Report>> {
        let reports = self.store.reports.read().await;
        let mut matching: Vec<Report> = reports
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(Page {
            total: matching.len() as i64,
            items: page.apply(&matching),
        })
    }

    async fn all(&self) -> Result<Vec<Report>> {
        let mut all = self.store.reports.read().await.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Report>> {
        let reports = self.store.reports.read().await;
        Ok(reports.iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, report: &Report) -> Result<Report> {
        self.store.reports.write().await.push(report.clone());
        Ok(report.clone())
    }

    async fn update(&self, report: &Report) -> Result<Option<Report>> {
        let mut reports = self.store.reports.write().await;
        Ok(reports.iter_mut().find(|r| r.id == report.id).map(|existing| {
            existing.content = report.content.clone();
            existing.image_url = report.image_url.clone();
            existing.verification_status = report.verification_status;
            existing.verification = report.verification.clone();
            existing.clone()
        }))
    }

    async fn set_verification(
        &self,
        id: Uuid,
        status: VerificationStatus,
        verification: &ImageVerification,
    ) -> Result<Option<Report>> {
        let mut reports = self.store.reports.write().await;
        Ok(reports.iter_mut().find(|r| r.id == id).map(|existing| {
            existing.verification_status = status;
            existing.verification = Some(Json(verification.clone()));
            existing.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Report>> {
        let mut reports = self.store.reports.write().await;
        let position = reports.iter().position(|r| r.id == id);
        Ok(position.map(|i| reports.remove(i)))
    }
}
