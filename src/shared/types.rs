use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Uniform response envelope used by every endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Pagination metadata attached to list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(query: &PaginationQuery, total: i64) -> Self {
        let limit = query.limit();
        let total_pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            page: query.page(),
            limit,
            total,
            total_pages,
        }
    }
}

/// Standard pagination query parameters for all list endpoints
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationQuery {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// Page number clamped so that the derived offset cannot overflow
    pub fn page(&self) -> i64 {
        self.page.clamp(1, i64::MAX / MAX_PAGE_SIZE)
    }

    /// Calculate SQL OFFSET from page number
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Get clamped page size (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    /// Slice an already-filtered in-memory list
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.offset() as usize)
            .take(self.limit() as usize)
            .cloned()
            .collect()
    }
}

/// Urgency of a social post or report, ordered low to urgent
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ToSchema,
    schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Urgent => write!(f, "urgent"),
        }
    }
}

/// A page of items plus the unpaginated total
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            data,
            error: None,
            message,
            pagination: None,
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            pagination: Some(pagination),
        }
    }

    pub fn error(error: String, message: Option<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error),
            message,
            pagination: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_total_pages_rounds_up() {
        let q = PaginationQuery::new(2, 10);
        let p = Pagination::new(&q, 25);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.page, 2);

        let empty = Pagination::new(&q, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_pagination_query_clamps() {
        let q = PaginationQuery::new(0, 1000);
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), MAX_PAGE_SIZE);
        assert_eq!(q.offset(), 0);

        let items: Vec<i32> = (0..30).collect();
        assert_eq!(PaginationQuery::new(3, 10).apply(&items), (20..30).collect::<Vec<_>>());
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        for limit in [1, 10, MAX_PAGE_SIZE, i64::MAX] {
            let q = PaginationQuery::new(i64::MAX, limit);
            assert!(q.offset() >= 0);
            assert!(q.apply(&[1, 2, 3]).is_empty());
        }

        let p = Pagination::new(&PaginationQuery::new(i64::MAX, 10), 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.page > 0);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::Medium > Priority::Low);
        assert_eq!(serde_json::to_value(Priority::Urgent).unwrap(), "urgent");
    }

    #[test]
    fn test_envelope_skips_empty_fields() {
        let body = serde_json::to_value(ApiResponse::success(Some(1), None)).unwrap();
        assert_eq!(body, serde_json::json!({"success": true, "data": 1}));

        let paginated = serde_json::to_value(ApiResponse::paginated(
            vec![1],
            Pagination::new(&PaginationQuery::default(), 1),
        ))
        .unwrap();
        assert_eq!(paginated["pagination"]["totalPages"], 1);
    }
}
