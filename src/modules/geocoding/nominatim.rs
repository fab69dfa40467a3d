use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::modules::cache::CacheService;
use crate::shared::constants::{CACHE_PREFIX_GEOCODE, CACHE_PREFIX_REVERSE};
use crate::shared::geo::Coordinates;
use crate::shared::validation::valid_coordinates;

/// Nominatim search/reverse result
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    importance: Option<f64>,
}

/// Reverse lookups answer with `{"error": "..."}` when nothing is there
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReverseResponse {
    Place(NominatimPlace),
    Error {
        #[allow(dead_code)]
        error: String,
    },
}

/// Normalized geocoding answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeocodeResult {
    pub coordinates: Coordinates,
    pub display_name: String,
    pub importance: Option<f64>,
}

impl NominatimPlace {
    /// Validate at the adapter edge: unparseable or off-globe coordinates are dropped
    fn into_result(self) -> Option<GeocodeResult> {
        let lat: f64 = self.lat.trim().parse().ok()?;
        let lng: f64 = self.lon.trim().parse().ok()?;
        if !valid_coordinates(lat, lng) {
            return None;
        }
        Some(GeocodeResult {
            coordinates: Coordinates::new(lat, lng),
            display_name: self.display_name,
            importance: self.importance,
        })
    }
}

/// Forward and reverse geocoding over Nominatim, with cached answers
pub struct GeocodingService {
    client: reqwest::Client,
    base_url: String,
    cache: Arc<CacheService>,
    cache_ttl: Duration,
}

impl GeocodingService {
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
        cache: Arc<CacheService>,
        cache_ttl: Duration,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(timeout)
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
            cache_ttl,
        })
    }

    fn forward_key(location_name: &str) -> String {
        let normalized = location_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        format!("{}:{}", CACHE_PREFIX_GEOCODE, normalized)
    }

    fn reverse_key(lat: f64, lng: f64) -> String {
        format!("{}:{:.4},{:.4}", CACHE_PREFIX_REVERSE, lat, lng)
    }

    /// Resolve a place name to coordinates.
    ///
    /// Misses are cached too, so an unknown place isn't re-queried every request.
    pub async fn forward(&self, location_name: &str) -> Option<GeocodeResult> {
        let trimmed = location_name.trim();
        if trimmed.is_empty() {
            return None;
        }

        let key = Self::forward_key(trimmed);
        if let Some(cached) = self.cache.get_json::<Option<GeocodeResult>>(&key).await {
            tracing::debug!("Geocode cache hit: {}", key);
            return cached;
        }

        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(trimmed)
        );
        tracing::debug!("Geocoding (forward): {} -> {}", trimmed, url);

        let result = match self.fetch::<Vec<NominatimPlace>>(&url).await {
            Some(places) => places.into_iter().next().and_then(NominatimPlace::into_result),
            // Upstream failure: don't cache, next request may succeed
            None => return None,
        };

        self.cache.set_json(&key, &result, self.cache_ttl).await;
        result
    }

    /// Resolve coordinates to a place name
    pub async fn reverse(&self, lat: f64, lng: f64) -> Option<GeocodeResult> {
        if !valid_coordinates(lat, lng) {
            return None;
        }

        let key = Self::reverse_key(lat, lng);
        if let Some(cached) = self.cache.get_json::<Option<GeocodeResult>>(&key).await {
            return cached;
        }

        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json",
            self.base_url, lat, lng
        );
        tracing::debug!("Geocoding (reverse): {},{} -> {}", lat, lng, url);

        let result = match self.fetch::<ReverseResponse>(&url).await? {
            ReverseResponse::Place(place) => place.into_result(),
            ReverseResponse::Error { .. } => None,
        };

        self.cache.set_json(&key, &result, self.cache_ttl).await;
        result
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: &str) -> Option<T> {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Nominatim request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Nominatim returned status: {}", response.status());
            return None;
        }

        match response.json::<T>().await {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Failed to parse Nominatim response: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::cache::MemoryCacheStore;

    fn service(cache: Arc<CacheService>) -> GeocodingService {
        // Unroutable base URL: any network attempt fails fast
        GeocodingService::new(
            "http://127.0.0.1:9",
            "test-agent",
            Duration::from_millis(200),
            cache,
            Duration::from_secs(60),
        )
        .unwrap()
    }

    #[test]
    fn test_place_validation() {
        let ok = NominatimPlace {
            lat: "40.7128".into(),
            lon: "-74.0060".into(),
            display_name: "New York".into(),
            importance: Some(0.9),
        };
        let r = ok.into_result().unwrap();
        assert_eq!(r.coordinates, Coordinates::new(40.7128, -74.0060));

        let bad = NominatimPlace {
            lat: "north".into(),
            lon: "-74".into(),
            display_name: "x".into(),
            importance: None,
        };
        assert!(bad.into_result().is_none());

        let off_globe = NominatimPlace {
            lat: "123".into(),
            lon: "0".into(),
            display_name: "x".into(),
            importance: None,
        };
        assert!(off_globe.into_result().is_none());
    }

    #[test]
    fn test_reverse_error_body_parses() {
        let parsed: ReverseResponse =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert!(matches!(parsed, ReverseResponse::Error { .. }));
    }

    #[test]
    fn test_forward_key_normalizes() {
        assert_eq!(
            GeocodingService::forward_key("  Main   St, NYC "),
            "geocode:main st, nyc"
        );
    }

    #[tokio::test]
    async fn test_forward_served_from_cache() {
        let cache = Arc::new(CacheService::new(Arc::new(MemoryCacheStore::new())));
        let expected = GeocodeResult {
            coordinates: Coordinates::new(40.7, -74.0),
            display_name: "Main St, New York".into(),
            importance: None,
        };
        cache
            .set_json(
                &GeocodingService::forward_key("Main St"),
                &Some(expected.clone()),
                Duration::from_secs(60),
            )
            .await;

        let svc = service(Arc::clone(&cache));
        assert_eq!(svc.forward("main st").await, Some(expected));
    }

    #[tokio::test]
    async fn test_forward_upstream_failure_is_none_and_not_cached() {
        let cache = Arc::new(CacheService::new(Arc::new(MemoryCacheStore::new())));
        let svc = service(Arc::clone(&cache));
        assert!(svc.forward("Nowhere").await.is_none());
        assert!(cache.get(&GeocodingService::forward_key("Nowhere")).await.is_none());
        assert!(svc.forward("   ").await.is_none());
    }
}
