use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::types::Priority;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Engagement {
    pub likes: i64,
    pub shares: i64,
    pub replies: i64,
}

/// A normalized social post; never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SocialMediaPost {
    pub id: String,
    pub platform: String,
    pub username: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub disaster_id: Option<Uuid>,
    pub priority: Priority,
    pub engagement: Option<Engagement>,
    pub url: Option<String>,
    pub is_official: bool,
}

/// Where a batch of posts came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostOrigin {
    Live,
    Cached,
    Fixture,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SocialFeed {
    pub posts: Vec<SocialMediaPost>,
    pub origin: PostOrigin,
}
