use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::DisasterRepository;
use crate::core::error::{AppError, Result};
use crate::features::disasters::models::{AuditEntry, Disaster, DisasterFilter};
use crate::shared::geo::{distance_sql, Coordinates};
use crate::shared::types::{Page, PaginationQuery};

const COLUMNS: &str = "id, title, location_name, lat, lng, description, tags, owner_id, \
                       audit_trail, created_at, updated_at";

/// Shared WHERE clause; $1 tag, $2 owner, $3 search
const FILTER: &str = "($1::text IS NULL OR $1 = ANY(tags)) \
                      AND ($2::text IS NULL OR owner_id = $2) \
                      AND ($3::text IS NULL OR title ILIKE '%' || $3 || '%' \
                           OR description ILIKE '%' || $3 || '%' \
                           OR location_name ILIKE '%' || $3 || '%')";

pub struct PgDisasterRepository {
    pool: PgPool,
}

impl PgDisasterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(action: &str, e: sqlx::Error) -> AppError {
    tracing::error!("Failed to {}: {:?}", action, e);
    AppError::Database(e)
}

#[async_trait]
impl DisasterRepository for PgDisasterRepository {
    async fn list(&self, filter: &DisasterFilter, page: &PaginationQuery) -> Result<Page<Disaster>> {
        let sql = format!(
            "SELECT {} FROM disasters WHERE {} ORDER BY created_at DESC LIMIT $4 OFFSET $5",
            COLUMNS, FILTER
        );
        let items = sqlx::query_as::<_, Disaster>(&sql)
            .bind(&filter.tag)
            .bind(&filter.owner_id)
            .bind(&filter.search)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list disasters", e))?;

        let count_sql = format!("SELECT COUNT(*) FROM disasters WHERE {}", FILTER);
        let (total,): (i64,) = sqlx::query_as(&count_sql)
            .bind(&filter.tag)
            .bind(&filter.owner_id)
            .bind(&filter.search)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count disasters", e))?;

        Ok(Page { items, total })
    }

    async fn all(&self) -> Result<Vec<Disaster>> {
        let sql = format!("SELECT {} FROM disasters ORDER BY created_at DESC", COLUMNS);
        sqlx::query_as::<_, Disaster>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("fetch disasters", e))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Disaster>> {
        let sql = format!("SELECT {} FROM disasters WHERE id = $1", COLUMNS);
        sqlx::query_as::<_, Disaster>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("get disaster", e))
    }

    async fn insert(&self, d: &Disaster) -> Result<Disaster> {
        let sql = format!(
            "INSERT INTO disasters ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {}",
            COLUMNS, COLUMNS
        );
        sqlx::query_as::<_, Disaster>(&sql)
            .bind(d.id)
            .bind(&d.title)
            .bind(&d.location_name)
            .bind(d.lat)
            .bind(d.lng)
            .bind(&d.description)
            .bind(&d.tags)
            .bind(&d.owner_id)
            .bind(&d.audit_trail)
            .bind(d.created_at)
            .bind(d.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("create disaster", e))
    }

    async fn update(&self, d: &Disaster, audit: &AuditEntry) -> Result<Option<Disaster>> {
        let sql = format!(
            "UPDATE disasters SET title = $2, location_name = $3, lat = $4, lng = $5, \
             description = $6, tags = $7, updated_at = $8, \
             audit_trail = audit_trail || jsonb_build_array($9::jsonb) \
             WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        sqlx::query_as::<_, Disaster>(&sql)
            .bind(d.id)
            .bind(&d.title)
            .bind(&d.location_name)
            .bind(d.lat)
            .bind(d.lng)
            .bind(&d.description)
            .bind(&d.tags)
            .bind(d.updated_at)
            .bind(Json(audit))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("update disaster", e))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        // reports and resources go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM disasters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete disaster", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn nearby(&self, point: Coordinates, radius_m: f64) -> Result<Vec<Disaster>> {
        let sql = format!(
            "SELECT {} FROM disasters \
             WHERE lat IS NOT NULL AND lng IS NOT NULL AND {} <= $3 \
             ORDER BY created_at DESC",
            COLUMNS,
            distance_sql("$1", "$2")
        );
        sqlx::query_as::<_, Disaster>(&sql)
            .bind(point.lat)
            .bind(point.lng)
            .bind(radius_m)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("find nearby disasters", e))
    }
}
