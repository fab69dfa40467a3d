use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, CurrentUser};
use crate::features::auth::dtos::{AuthUserDto, LoginRequestDto, LoginResponseDto};
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;

/// Log in with a demo account
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.login(&dto.username, &dto.password)?;

    Ok(Json(ApiResponse::success(
        Some(response),
        Some("Login successful".to_string()),
    )))
}

/// Current user
///
/// A valid bearer token wins; otherwise the caller is identified by
/// `X-User-Id`, falling back to the default demo user.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    params(("X-User-Id" = Option<String>, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<AuthUserDto>),
        (status = 401, description = "Invalid bearer token")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn get_me(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
    user: CurrentUser,
) -> Result<Json<ApiResponse<AuthUserDto>>> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let resolved = match bearer {
        Some(token) => service.verify(token)?,
        None => service.resolve_user_id(&user.id),
    };

    Ok(Json(ApiResponse::success(Some(resolved), None)))
}
