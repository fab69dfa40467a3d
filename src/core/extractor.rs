use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;

/// Header carrying the acting user's id
pub const USER_ID_HEADER: &str = "x-user-id";

/// User assumed when a request names none
pub const DEFAULT_USER_ID: &str = "netrunnerX";

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// Acting user for audit and ownership fields.
///
/// Authentication is mock-only: the id comes from `X-User-Id`, falling back
/// to the default demo user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = match parts.headers.get(USER_ID_HEADER) {
            Some(value) => value
                .to_str()
                .map_err(|_| AppError::BadRequest("Invalid X-User-Id header".to_string()))?
                .trim()
                .to_string(),
            None => String::new(),
        };

        if id.is_empty() {
            return Ok(Self {
                id: DEFAULT_USER_ID.to_string(),
            });
        }
        if id.len() > 64 {
            return Err(AppError::BadRequest(
                "X-User-Id must not exceed 64 characters".to_string(),
            ));
        }
        Ok(Self { id })
    }
}
