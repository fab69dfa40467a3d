use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::models::{MockUser, UserRole};

/// Request DTO for mock login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response DTO for a successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    /// Signed session token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    pub user: AuthUserDto,
}

/// Resolved identity of the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    /// True when the identity came from a bearer token rather than `X-User-Id`
    pub authenticated: bool,
}

impl AuthUserDto {
    pub fn from_mock(user: &MockUser, authenticated: bool) -> Self {
        Self {
            id: user.username.to_string(),
            username: user.username.to_string(),
            role: user.role,
            authenticated,
        }
    }
}
