use serde::Deserialize;

use super::client::FeedError;
use super::models::Shelter;
use crate::shared::geo::Coordinates;
use crate::shared::validation::valid_coordinates;

#[derive(Debug, Deserialize)]
pub(super) struct ArcGisResponse {
    #[serde(default)]
    features: Vec<ArcGisFeature>,
    error: Option<ArcGisError>,
}

#[derive(Debug, Deserialize)]
struct ArcGisError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ArcGisFeature {
    attributes: ShelterAttributes,
    geometry: Option<Point>,
}

#[derive(Debug, Deserialize)]
struct Point {
    x: Option<f64>,
    y: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct ShelterAttributes {
    shelter_id: Option<i64>,
    shelter_name: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    evacuation_capacity: Option<f64>,
    total_population: Option<f64>,
    shelter_status: Option<String>,
}

/// Convert an ArcGIS query result. ArcGIS reports errors with HTTP 200 and an
/// `error` object, which is surfaced as a failure.
pub(super) fn parse_shelters(body: ArcGisResponse) -> Result<Vec<Shelter>, FeedError> {
    if let Some(error) = body.error {
        return Err(FeedError::Upstream(error.message));
    }

    Ok(body
        .features
        .into_iter()
        .filter_map(|feature| {
            let attrs = feature.attributes;
            let id = attrs.shelter_id?;
            let name = attrs.shelter_name.filter(|n| !n.trim().is_empty())?;

            let (lat, lng) = match (attrs.latitude, attrs.longitude, feature.geometry) {
                (Some(lat), Some(lng), _) => (Some(lat), Some(lng)),
                (_, _, Some(point)) => (point.y, point.x),
                _ => (None, None),
            };
            let coordinates = Coordinates::from_parts(lat, lng)
                .filter(|c| valid_coordinates(c.lat, c.lng));

            Some(Shelter {
                id: id.to_string(),
                name,
                address: attrs.address,
                city: attrs.city,
                state: attrs.state,
                coordinates,
                capacity: attrs.evacuation_capacity.map(|c| c as i64),
                population: attrs.total_population.map(|p| p as i64),
                status: attrs.shelter_status.unwrap_or_else(|| "UNKNOWN".to_string()),
                disaster_id: None,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shelters() {
        let raw = r#"{
            "features": [
                {
                    "attributes": {
                        "SHELTER_ID": 501,
                        "SHELTER_NAME": "Brooklyn Tech HS",
                        "ADDRESS": "29 Fort Greene Pl",
                        "CITY": "Brooklyn",
                        "STATE": "NY",
                        "EVACUATION_CAPACITY": 800,
                        "TOTAL_POPULATION": 120,
                        "SHELTER_STATUS": "OPEN"
                    },
                    "geometry": {"x": -73.9766, "y": 40.6889}
                },
                {"attributes": {"SHELTER_ID": 502}},
                {"attributes": {"SHELTER_ID": 503, "SHELTER_NAME": "Off Map", "LATITUDE": 95.0, "LONGITUDE": 10.0}}
            ]
        }"#;
        let body: ArcGisResponse = serde_json::from_str(raw).unwrap();
        let shelters = parse_shelters(body).unwrap();

        assert_eq!(shelters.len(), 2);
        assert_eq!(
            shelters[0].coordinates,
            Some(Coordinates::new(40.6889, -73.9766))
        );
        assert_eq!(shelters[0].capacity, Some(800));
        assert_eq!(
            shelters[0].location_text(),
            "29 Fort Greene Pl, Brooklyn, NY"
        );
        assert!(shelters[1].coordinates.is_none());
    }

    #[test]
    fn test_arcgis_error_body_is_failure() {
        let body: ArcGisResponse =
            serde_json::from_str(r#"{"error": {"code": 400, "message": "Invalid query"}}"#).unwrap();
        assert!(matches!(parse_shelters(body), Err(FeedError::Upstream(_))));
    }
}
