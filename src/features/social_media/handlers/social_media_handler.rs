use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::social_media::dtos::{
    CreatePostDto, CreatePostResponseDto, SocialFeedResponseDto, SocialSearchQuery,
};
use crate::features::social_media::routes::SocialMediaState;
use crate::modules::events::EventKind;
use crate::modules::social::{SocialFeed, SocialMediaPost};
use crate::shared::types::{ApiResponse, Priority};

/// Posts to scan when filtering for urgent or official ones
const SCAN_LIMIT: usize = 40;

fn retain_disaster(feed: &mut SocialFeed, query: &SocialSearchQuery) {
    if let Some(disaster_id) = query.disaster_id {
        feed.posts.retain(|p| p.disaster_id == Some(disaster_id));
    }
}

/// Search social media posts
#[utoipa::path(
    get,
    path = "/api/social-media/search",
    params(SocialSearchQuery),
    responses(
        (status = 200, description = "Matching posts", body = ApiResponse<SocialFeedResponseDto>)
    ),
    tag = "social-media"
)]
pub async fn search_posts(
    State(state): State<SocialMediaState>,
    Query(query): Query<SocialSearchQuery>,
) -> Result<Json<ApiResponse<SocialFeedResponseDto>>> {
    let disasters = state.disaster_refs().await;
    let mut feed = state
        .social
        .search(query.q.as_deref().unwrap_or(""), query.limit(), &disasters)
        .await;
    retain_disaster(&mut feed, &query);

    Ok(Json(ApiResponse::success(
        Some(SocialFeedResponseDto::new(feed.posts, feed.origin)),
        None,
    )))
}

/// High and urgent priority posts, most urgent first
#[utoipa::path(
    get,
    path = "/api/social-media/urgent",
    params(SocialSearchQuery),
    responses(
        (status = 200, description = "Urgent posts", body = ApiResponse<SocialFeedResponseDto>)
    ),
    tag = "social-media"
)]
pub async fn urgent_posts(
    State(state): State<SocialMediaState>,
    Query(query): Query<SocialSearchQuery>,
) -> Result<Json<ApiResponse<SocialFeedResponseDto>>> {
    let disasters = state.disaster_refs().await;
    let mut feed = state
        .social
        .search(query.q.as_deref().unwrap_or(""), SCAN_LIMIT, &disasters)
        .await;
    retain_disaster(&mut feed, &query);

    let mut posts: Vec<SocialMediaPost> = feed
        .posts
        .into_iter()
        .filter(|p| p.priority >= Priority::High)
        .collect();
    posts.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
    posts.truncate(query.limit());

    Ok(Json(ApiResponse::success(
        Some(SocialFeedResponseDto::new(posts, feed.origin)),
        None,
    )))
}

/// Posts from official accounts, newest first
#[utoipa::path(
    get,
    path = "/api/social-media/official",
    params(SocialSearchQuery),
    responses(
        (status = 200, description = "Official posts", body = ApiResponse<SocialFeedResponseDto>)
    ),
    tag = "social-media"
)]
pub async fn official_posts(
    State(state): State<SocialMediaState>,
    Query(query): Query<SocialSearchQuery>,
) -> Result<Json<ApiResponse<SocialFeedResponseDto>>> {
    let disasters = state.disaster_refs().await;
    let mut feed = state
        .social
        .search(query.q.as_deref().unwrap_or(""), SCAN_LIMIT, &disasters)
        .await;
    retain_disaster(&mut feed, &query);

    let mut posts: Vec<SocialMediaPost> =
        feed.posts.into_iter().filter(|p| p.is_official).collect();
    posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    posts.truncate(query.limit());

    Ok(Json(ApiResponse::success(
        Some(SocialFeedResponseDto::new(posts, feed.origin)),
        None,
    )))
}

/// Trending posts
#[utoipa::path(
    get,
    path = "/api/social-media/trending",
    params(SocialSearchQuery),
    responses(
        (status = 200, description = "Trending posts", body = ApiResponse<SocialFeedResponseDto>)
    ),
    tag = "social-media"
)]
pub async fn trending_posts(
    State(state): State<SocialMediaState>,
    Query(query): Query<SocialSearchQuery>,
) -> Result<Json<ApiResponse<SocialFeedResponseDto>>> {
    let disasters = state.disaster_refs().await;
    let mut feed = state.social.trending(query.limit(), &disasters).await;
    retain_disaster(&mut feed, &query);

    Ok(Json(ApiResponse::success(
        Some(SocialFeedResponseDto::new(feed.posts, feed.origin)),
        None,
    )))
}

/// Publish a post
///
/// Without platform credentials the post is simulated and `origin` is `fixture`.
#[utoipa::path(
    post,
    path = "/api/social-media/post",
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post published", body = ApiResponse<CreatePostResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "social-media"
)]
pub async fn create_post(
    State(state): State<SocialMediaState>,
    AppJson(dto): AppJson<CreatePostDto>,
) -> Result<(StatusCode, Json<ApiResponse<CreatePostResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let disasters = state.disaster_refs().await;
    let (mut post, origin) = state.social.post(dto.content.trim(), &disasters).await;
    if dto.disaster_id.is_some() {
        post.disaster_id = dto.disaster_id;
    }

    state
        .events
        .publish(EventKind::SocialMediaUpdated, post.disaster_id, &post);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(CreatePostResponseDto { post, origin }),
            None,
        )),
    ))
}
