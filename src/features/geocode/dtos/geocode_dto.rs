use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::modules::ai::LocationExtraction;
use crate::shared::geo::Coordinates;

/// Either a place name or free text to extract one from
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct GeocodeRequestDto {
    #[validate(length(max = 255, message = "Location name must not exceed 255 characters"))]
    pub location_name: Option<String>,

    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeocodeResponseDto {
    pub location_name: String,
    /// Present when the name was extracted from the description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction: Option<LocationExtraction>,
    pub coordinates: Option<Coordinates>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ReverseGeocodeQuery {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReverseGeocodeResponseDto {
    pub coordinates: Coordinates,
    pub display_name: Option<String>,
}
