use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::modules::social::{PostOrigin, SocialMediaPost};

pub const DEFAULT_POST_LIMIT: usize = 20;
pub const MAX_POST_LIMIT: usize = 100;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SocialSearchQuery {
    /// Search terms (default: general disaster keywords)
    pub q: Option<String>,
    /// Only posts correlated with this disaster
    pub disaster_id: Option<Uuid>,
    pub limit: Option<usize>,
}

impl SocialSearchQuery {
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_POST_LIMIT)
            .clamp(1, MAX_POST_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SocialFeedResponseDto {
    pub posts: Vec<SocialMediaPost>,
    pub total: usize,
    pub origin: PostOrigin,
}

impl SocialFeedResponseDto {
    pub fn new(posts: Vec<SocialMediaPost>, origin: PostOrigin) -> Self {
        Self {
            total: posts.len(),
            posts,
            origin,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePostDto {
    #[validate(
        length(max = 500, message = "Content must not exceed 500 characters"),
        regex(
            path = "*crate::shared::validation::NOT_BLANK_REGEX",
            message = "Content is required"
        )
    )]
    #[serde(default)]
    pub content: String,

    /// Overrides keyword correlation
    pub disaster_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePostResponseDto {
    pub post: SocialMediaPost,
    pub origin: PostOrigin,
}
