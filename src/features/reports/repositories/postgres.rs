use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::ReportRepository;
use crate::core::error::{AppError, Result};
use crate::features::reports::models::{Report, ReportFilter, VerificationStatus};
use crate::modules::ai::ImageVerification;
use crate::shared::types::{Page, PaginationQuery};

const COLUMNS: &str =
    "id, disaster_id, user_id, content, image_url, verification_status, verification, created_at";

/// $1 disaster, $2 status
const FILTER: &str = "($1::uuid IS NULL OR disaster_id = $1) \
                      AND ($2::verification_status IS NULL OR verification_status = $2)";

pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(action: &str, e: sqlx::Error) -> AppError {
    tracing::error!("Failed to {}: {:?}", action, e);
    AppError::Database(e)
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn list(&self, filter: &ReportFilter, page: &PaginationQuery) -> Result<Page<Report>> {
        let sql = format!(
            "SELECT {} FROM reports WHERE {} ORDER BY created_at DESC LIMIT $3 OFFSET $4",
            COLUMNS, FILTER
        );
        let items = sqlx::query_as::<_, Report>(&sql)
            .bind(filter.disaster_id)
            .bind(filter.status)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list reports", e))?;

        let count_sql = format!("SELECT COUNT(*) FROM reports WHERE {}", FILTER);
        let (total,): (i64,) = sqlx::query_as(&count_sql)
            .bind(filter.disaster_id)
            .bind(filter.status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count reports", e))?;

        Ok(Page { items, total })
    }

    async fn all(&self) -> Result<Vec<Report>> {
        let sql = format!("SELECT {} FROM reports ORDER BY created_at DESC", COLUMNS);
        sqlx::query_as::<_, Report>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("fetch reports", e))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Report>> {
        let sql = format!("SELECT {} FROM reports WHERE id = $1", COLUMNS);
        sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("get report", e))
    }

    async fn insert(&self, r: &Report) -> Result<Report> {
        let sql = format!(
            "INSERT INTO reports ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            COLUMNS, COLUMNS
        );
        sqlx::query_as::<_, Report>(&sql)
            .bind(r.id)
            .bind(r.disaster_id)
            .bind(&r.user_id)
            .bind(&r.content)
            .bind(&r.image_url)
            .bind(r.verification_status)
            .bind(&r.verification)
            .bind(r.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("create report", e))
    }

    async fn update(&self, r: &Report) -> Result<Option<Report>> {
        let sql = format!(
            "UPDATE reports SET content = $2, image_url = $3, verification_status = $4, \
             verification = $5 WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        sqlx::query_as::<_, Report>(&sql)
            .bind(r.id)
            .bind(&r.content)
            .bind(&r.image_url)
            .bind(r.verification_status)
            .bind(&r.verification)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("update report", e))
    }

    async fn set_verification(
        &self,
        id: Uuid,
        status: VerificationStatus,
        verification: &ImageVerification,
    ) -> Result<Option<Report>> {
        let sql = format!(
            "UPDATE reports SET verification_status = $2, verification = $3 \
             WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .bind(status)
            .bind(Json(verification))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("record report verification", e))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Report>> {
        let sql = format!("DELETE FROM reports WHERE id = $1 RETURNING {}", COLUMNS);
        sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("delete report", e))
    }
}
