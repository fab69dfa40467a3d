use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::geocode::dtos::{
    GeocodeRequestDto, GeocodeResponseDto, ReverseGeocodeQuery, ReverseGeocodeResponseDto,
};
use crate::features::geocode::routes::GeocodeState;
use crate::shared::constants::UNKNOWN_LOCATION;
use crate::shared::geo::Coordinates;
use crate::shared::types::ApiResponse;
use crate::shared::validation::valid_coordinates;

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Geocode a place name, or a place mentioned in a description
#[utoipa::path(
    post,
    path = "/api/geocode",
    request_body = GeocodeRequestDto,
    responses(
        (status = 200, description = "Resolved location", body = ApiResponse<GeocodeResponseDto>),
        (status = 400, description = "Neither location_name nor description given")
    ),
    tag = "geocode"
)]
pub async fn geocode(
    State(state): State<GeocodeState>,
    AppJson(dto): AppJson<GeocodeRequestDto>,
) -> Result<Json<ApiResponse<GeocodeResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (location_name, extraction) = match (present(&dto.location_name), present(&dto.description)) {
        (Some(name), _) => (name.to_string(), None),
        (None, Some(description)) => {
            let extraction = state.ai.extract_location(description).await;
            let name = extraction
                .location_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
            (name, Some(extraction))
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "Either location_name or description is required".to_string(),
            ))
        }
    };

    let result = if location_name == UNKNOWN_LOCATION {
        None
    } else {
        state.geocoder.forward(&location_name).await
    };

    Ok(Json(ApiResponse::success(
        Some(GeocodeResponseDto {
            location_name,
            extraction,
            coordinates: result.as_ref().map(|r| r.coordinates),
            display_name: result.map(|r| r.display_name),
        }),
        None,
    )))
}

/// Reverse geocode a coordinate pair
#[utoipa::path(
    get,
    path = "/api/geocode/reverse",
    params(ReverseGeocodeQuery),
    responses(
        (status = 200, description = "Nearest address, if any", body = ApiResponse<ReverseGeocodeResponseDto>),
        (status = 400, description = "Invalid coordinates")
    ),
    tag = "geocode"
)]
pub async fn reverse_geocode(
    State(state): State<GeocodeState>,
    Query(query): Query<ReverseGeocodeQuery>,
) -> Result<Json<ApiResponse<ReverseGeocodeResponseDto>>> {
    if !valid_coordinates(query.lat, query.lng) {
        return Err(AppError::Validation("Invalid coordinates".to_string()));
    }

    let result = state.geocoder.reverse(query.lat, query.lng).await;
    Ok(Json(ApiResponse::success(
        Some(ReverseGeocodeResponseDto {
            coordinates: Coordinates::new(query.lat, query.lng),
            display_name: result.map(|r| r.display_name),
        }),
        None,
    )))
}
