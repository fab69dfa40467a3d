use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::ResourceRepository;
use crate::core::error::{AppError, Result};
use crate::features::resources::models::{Resource, ResourceFilter};
use crate::shared::geo::distance_sql;
use crate::shared::types::{Page, PaginationQuery};

const COLUMNS: &str = "id, disaster_id, name, location_name, lat, lng, resource_type, capacity, \
                       available, created_at";

/// $1 disaster, $2 type, $3 available, $4 lat, $5 lng, $6 radius (metres)
fn filter_sql() -> String {
    format!(
        "($1::uuid IS NULL OR disaster_id = $1) \
         AND ($2::resource_type IS NULL OR resource_type = $2) \
         AND ($3::boolean IS NULL OR available = $3) \
         AND ($4::float8 IS NULL OR $5::float8 IS NULL OR $6::float8 IS NULL OR ( \
             lat IS NOT NULL AND lng IS NOT NULL AND {} <= $6))",
        distance_sql("$4", "$5")
    )
}

pub struct PgResourceRepository {
    pool: PgPool,
}

impl PgResourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(action: &str, e: sqlx::Error) -> AppError {
    tracing::error!("Failed to {}: {:?}", action, e);
    AppError::Database(e)
}

type FilterBinds = (
    Option<Uuid>,
    Option<crate::features::resources::models::ResourceType>,
    Option<bool>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
);

fn binds(filter: &ResourceFilter) -> FilterBinds {
    let (lat, lng, radius) = match filter.near {
        Some((point, radius)) => (Some(point.lat), Some(point.lng), Some(radius)),
        None => (None, None, None),
    };
    (
        filter.disaster_id,
        filter.resource_type,
        filter.available,
        lat,
        lng,
        radius,
    )
}

#[async_trait]
impl ResourceRepository for PgResourceRepository {
    async fn list(&self, filter: &ResourceFilter, page: &PaginationQuery) -> Result<Page<Resource>> {
        let (disaster_id, resource_type, available, lat, lng, radius) = binds(filter);

        let sql = format!(
            "SELECT {} FROM resources WHERE {} ORDER BY created_at DESC LIMIT $7 OFFSET $8",
            COLUMNS, filter_sql()
        );
        let items = sqlx::query_as::<_, Resource>(&sql)
            .bind(disaster_id)
            .bind(resource_type)
            .bind(available)
            .bind(lat)
            .bind(lng)
            .bind(radius)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list resources", e))?;

        let count_sql = format!("SELECT COUNT(*) FROM resources WHERE {}", filter_sql());
        let (total,): (i64,) = sqlx::query_as(&count_sql)
            .bind(disaster_id)
            .bind(resource_type)
            .bind(available)
            .bind(lat)
            .bind(lng)
            .bind(radius)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count resources", e))?;

        Ok(Page { items, total })
    }

    async fn all(&self, filter: &ResourceFilter) -> Result<Vec<Resource>> {
        let (disaster_id, resource_type, available, lat, lng, radius) = binds(filter);
        let sql = format!(
            "SELECT {} FROM resources WHERE {} ORDER BY created_at DESC",
            COLUMNS, filter_sql()
        );
        sqlx::query_as::<_, Resource>(&sql)
            .bind(disaster_id)
            .bind(resource_type)
            .bind(available)
            .bind(lat)
            .bind(lng)
            .bind(radius)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("fetch resources", e))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Resource>> {
        let sql = format!("SELECT {} FROM resources WHERE id = $1", COLUMNS);
        sqlx::query_as::<_, Resource>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("get resource", e))
    }

    async fn insert(&self, r: &Resource) -> Result<Resource> {
        let sql = format!(
            "INSERT INTO resources ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {}",
            COLUMNS, COLUMNS
        );
        sqlx::query_as::<_, Resource>(&sql)
            .bind(r.id)
            .bind(r.disaster_id)
            .bind(&r.name)
            .bind(&r.location_name)
            .bind(r.lat)
            .bind(r.lng)
            .bind(r.resource_type)
            .bind(r.capacity)
            .bind(r.available)
            .bind(r.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("create resource", e))
    }

    async fn update(&self, r: &Resource) -> Result<Option<Resource>> {
        let sql = format!(
            "UPDATE resources SET name = $2, location_name = $3, lat = $4, lng = $5, \
             resource_type = $6, capacity = $7, available = $8 \
             WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        sqlx::query_as::<_, Resource>(&sql)
            .bind(r.id)
            .bind(&r.name)
            .bind(&r.location_name)
            .bind(r.lat)
            .bind(r.lng)
            .bind(r.resource_type)
            .bind(r.capacity)
            .bind(r.available)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("update resource", e))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Resource>> {
        let sql = format!("DELETE FROM resources WHERE id = $1 RETURNING {}", COLUMNS);
        sqlx::query_as::<_, Resource>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("delete resource", e))
    }
}
