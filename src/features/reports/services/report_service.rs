use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::disasters::repositories::DisasterRepository;
use crate::features::reports::dtos::{
    CreateReportDto, ReportListQuery, ReportResponseDto, ReportStatisticsDto, UpdateReportDto,
};
use crate::features::reports::models::{Report, ReportFilter, VerificationStatus};
use crate::features::reports::repositories::ReportRepository;
use crate::modules::ai::{AiService, ImageVerification};
use crate::modules::events::{EventHub, EventKind};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::{Page, PaginationQuery};

/// Service for citizen reports attached to disasters
pub struct ReportService {
    repository: Arc<dyn ReportRepository>,
    disasters: Arc<dyn DisasterRepository>,
    ai: Arc<AiService>,
    events: Arc<EventHub>,
}

impl ReportService {
    pub fn new(
        repository: Arc<dyn ReportRepository>,
        disasters: Arc<dyn DisasterRepository>,
        ai: Arc<AiService>,
        events: Arc<EventHub>,
    ) -> Self {
        Self {
            repository,
            disasters,
            ai,
            events,
        }
    }

    pub fn repository(&self) -> Arc<dyn ReportRepository> {
        Arc::clone(&self.repository)
    }

    pub async fn list(&self, query: &ReportListQuery) -> Result<Page<Report>> {
        let filter = ReportFilter {
            disaster_id: query.disaster_id,
            status: query.status,
        };
        let page = PaginationQuery::new(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        );
        self.repository.list(&filter, &page).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Report> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// File a new pending report against an existing disaster
    pub async fn create(&self, dto: CreateReportDto, user_id: &str) -> Result<Report> {
        if self.disasters.get(dto.disaster_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Disaster {} not found",
                dto.disaster_id
            )));
        }

        let report = Report {
            id: Uuid::new_v4(),
            disaster_id: dto.disaster_id,
            user_id: user_id.to_string(),
            content: dto.content.trim().to_string(),
            image_url: dto.image_url.filter(|u| !u.trim().is_empty()),
            verification_status: VerificationStatus::Pending,
            verification: None,
            created_at: Utc::now(),
        };

        let created = self.repository.insert(&report).await?;
        tracing::info!(
            "Report created: {} for disaster {} by {}",
            created.id,
            created.disaster_id,
            user_id
        );

        self.events.publish_to_room(
            EventKind::ReportCreated,
            created.disaster_id,
            &ReportResponseDto::from(created.clone()),
        );
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, dto: UpdateReportDto) -> Result<Report> {
        let mut report = self.get(id).await?;

        if let Some(content) = dto.content {
            report.content = content.trim().to_string();
        }
        if let Some(image_url) = dto.image_url {
            if report.image_url.as_deref() != Some(image_url.as_str()) {
                // A new image invalidates the previous verdict
                report.image_url = Some(image_url);
                report.verification_status = VerificationStatus::Pending;
                report.verification = None;
            }
        }
        if let Some(status) = dto.verification_status {
            report.verification_status = status;
        }

        self.repository
            .update(&report)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;
        tracing::info!("Report deleted: {}", id);

        self.events.publish_to_room(
            EventKind::ReportDeleted,
            deleted.disaster_id,
            &json!({ "id": deleted.id, "disaster_id": deleted.disaster_id }),
        );
        Ok(())
    }

    /// Run image verification on the report's own image
    pub async fn verify(
        &self,
        id: Uuid,
        context: Option<&str>,
    ) -> Result<(Report, ImageVerification)> {
        let report = self.get(id).await?;
        let image_url = report
            .image_url
            .clone()
            .ok_or_else(|| AppError::BadRequest("Report has no image to verify".to_string()))?;

        let context = context.unwrap_or(report.content.as_str());
        let verification = self.ai.verify_image(&image_url, Some(context)).await;
        let updated = self.apply_verification(id, &verification).await?;
        Ok((updated, verification))
    }

    /// Record a verdict: authentic images become verified, others rejected
    pub async fn apply_verification(
        &self,
        id: Uuid,
        verification: &ImageVerification,
    ) -> Result<Report> {
        let status = VerificationStatus::from_verdict(verification.authentic);
        let updated = self
            .repository
            .set_verification(id, status, verification)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;
        tracing::info!(
            "Report {} marked {} (confidence {:.2}, fallback: {})",
            id,
            status,
            verification.confidence,
            verification.is_fallback
        );

        self.events.publish_to_room(
            EventKind::ReportVerified,
            updated.disaster_id,
            &json!({
                "report": ReportResponseDto::from(updated.clone()),
                "verification": verification,
            }),
        );
        Ok(updated)
    }

    pub async fn statistics(&self) -> Result<ReportStatisticsDto> {
        let all = self.repository.all().await?;

        let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_disaster: BTreeMap<Uuid, usize> = BTreeMap::new();
        for report in &all {
            *by_status
                .entry(report.verification_status.to_string())
                .or_default() += 1;
            *by_disaster.entry(report.disaster_id).or_default() += 1;
        }

        Ok(ReportStatisticsDto {
            total: all.len(),
            with_image: all.iter().filter(|r| r.image_url.is_some()).count(),
            by_status,
            by_disaster,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::disasters::repositories::MemoryDisasterRepository;
    use crate::features::fixtures::FixtureStore;
    use crate::features::reports::repositories::MemoryReportRepository;
    use crate::shared::test_helpers::TestContext;

    async fn setup() -> (TestContext, ReportService, Uuid) {
        let ctx = TestContext::new();
        let store = Arc::new(FixtureStore::seeded());
        let disaster_id = store.disasters.read().await[0].id;
        let service = ReportService::new(
            Arc::new(MemoryReportRepository::new(store.clone())),
            Arc::new(MemoryDisasterRepository::new(store)),
            ctx.ai.clone(),
            ctx.events.clone(),
        );
        (ctx, service, disaster_id)
    }

    fn dto(disaster_id: Uuid, image_url: Option<&str>) -> CreateReportDto {
        CreateReportDto {
            disaster_id,
            content: "Water up to the second floor".to_string(),
            image_url: image_url.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_is_pending_and_published_to_room() {
        let (ctx, service, disaster_id) = setup().await;
        let mut rx = ctx.events.subscribe();

        let report = service.create(dto(disaster_id, None), "citizen1").await.unwrap();
        assert_eq!(report.verification_status, VerificationStatus::Pending);

        let event = rx.try_recv().unwrap();
        assert_eq!(event.event, EventKind::ReportCreated);
        assert_eq!(event.room, Some(disaster_id));
    }

    #[tokio::test]
    async fn test_create_for_unknown_disaster() {
        let (_, service, _) = setup().await;
        let result = service.create(dto(Uuid::new_v4(), None), "citizen1").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_verify_without_model_fails_open() {
        let (_, service, disaster_id) = setup().await;
        let report = service
            .create(dto(disaster_id, Some("https://example.com/flood.jpg")), "citizen1")
            .await
            .unwrap();

        let (updated, verdict) = service.verify(report.id, None).await.unwrap();
        assert!(verdict.is_fallback);
        assert!(verdict.authentic);
        assert_eq!(updated.verification_status, VerificationStatus::Verified);
        assert!(updated.verification.is_some());
    }

    #[tokio::test]
    async fn test_verify_requires_image() {
        let (_, service, disaster_id) = setup().await;
        let report = service.create(dto(disaster_id, None), "citizen1").await.unwrap();
        assert!(matches!(
            service.verify(report.id, None).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_rejected_verdict() {
        let (_, service, disaster_id) = setup().await;
        let report = service.create(dto(disaster_id, None), "citizen1").await.unwrap();
        let verdict = ImageVerification {
            authentic: false,
            confidence: 0.9,
            explanation: "Stock photo".to_string(),
            indicators: vec!["watermark".to_string()],
            is_fallback: false,
        };

        let updated = service.apply_verification(report.id, &verdict).await.unwrap();
        assert_eq!(updated.verification_status, VerificationStatus::Rejected);
    }

    #[tokio::test]
    async fn test_new_image_resets_status() {
        let (_, service, disaster_id) = setup().await;
        let report = service
            .create(dto(disaster_id, Some("https://example.com/a.jpg")), "citizen1")
            .await
            .unwrap();
        service.verify(report.id, None).await.unwrap();

        let updated = service
            .update(
                report.id,
                UpdateReportDto {
                    image_url: Some("https://example.com/b.jpg".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.verification_status, VerificationStatus::Pending);
        assert!(updated.verification.is_none());

        let stored = service.get(report.id).await.unwrap();
        assert!(stored.verification.is_none());
    }

    #[tokio::test]
    async fn test_delete_publishes_to_room() {
        let (ctx, service, disaster_id) = setup().await;
        let report = service.create(dto(disaster_id, None), "citizen1").await.unwrap();
        let mut rx = ctx.events.subscribe();

        service.delete(report.id).await.unwrap();
        let event = rx.try_recv().unwrap();
        assert_eq!(event.event, EventKind::ReportDeleted);
        assert_eq!(event.room, Some(disaster_id));
        assert!(matches!(service.get(report.id).await, Err(AppError::NotFound(_))));
    }
}
