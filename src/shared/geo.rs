use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean Earth radius in metres
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build from nullable lat/lng columns
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Some(Self { lat, lng }),
            _ => None,
        }
    }

    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        haversine_distance(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Great-circle distance in metres
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = ((d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2))
    .min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Postgres great-circle distance in metres from the `lat`/`lng` columns to
/// the point bound at `lat_param`/`lng_param` (e.g. `"$4"`, `"$5"`)
pub fn distance_sql(lat_param: &str, lng_param: &str) -> String {
    format!(
        "6371000 * 2 * ASIN(SQRT(LEAST(1, \
             POWER(SIN(RADIANS(lat - {lat}) / 2), 2) \
             + COS(RADIANS({lat})) * COS(RADIANS(lat)) * POWER(SIN(RADIANS(lng - {lng}) / 2), 2) \
         )))",
        lat = lat_param,
        lng = lng_param,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Lower Manhattan to Brooklyn Heights, roughly 2km apart
        let manhattan = Coordinates::new(40.7128, -74.0060);
        let brooklyn = Coordinates::new(40.6959, -73.9956);
        let d = manhattan.distance_to(&brooklyn);
        assert!(d > 1_500.0 && d < 3_000.0, "distance was {}", d);

        // New York to Los Angeles, roughly 3940km
        let la = Coordinates::new(34.0522, -118.2437);
        let d = manhattan.distance_to(&la);
        assert!(d > 3_900_000.0 && d < 4_000_000.0);
    }

    #[test]
    fn test_haversine_same_point() {
        assert!(haversine_distance(40.7, -74.0, 40.7, -74.0) < 1.0);
    }

    #[test]
    fn test_antipodal_points_stay_finite() {
        let d = haversine_distance(0.0, 0.0, 0.0, 180.0);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_M).abs() < 1.0);

        let d = haversine_distance(40.7128, -74.0060, -40.7128, 105.994);
        assert!(d.is_finite() && d > 20_000_000.0);
    }

    #[test]
    fn test_distance_sql_clamps_asin_argument() {
        let sql = distance_sql("$1", "$2");
        assert!(sql.contains("ASIN(SQRT(LEAST(1, "));
        assert!(sql.contains("RADIANS(lat - $1)"));
        assert!(sql.contains("RADIANS(lng - $2)"));
    }

    #[test]
    fn test_from_parts_requires_both() {
        assert!(Coordinates::from_parts(Some(1.0), None).is_none());
        assert_eq!(
            Coordinates::from_parts(Some(1.0), Some(2.0)),
            Some(Coordinates::new(1.0, 2.0))
        );
    }
}
