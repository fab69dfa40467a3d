use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::fema::{parse_declarations, FemaResponse};
use super::models::{EmergencyAlert, Shelter, WeatherAlert};
use super::shelters::{parse_shelters, ArcGisResponse};
use super::weather::{parse_alerts, NwsResponse};
use crate::core::config::FeedsConfig;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed returned status {0}")]
    Status(u16),

    #[error("Feed error: {0}")]
    Upstream(String),
}

/// HTTP client for the public emergency feeds
pub struct FeedsClient {
    http: reqwest::Client,
    weather_url: String,
    fema_url: String,
    shelters_url: String,
}

impl FeedsClient {
    pub fn new(config: &FeedsConfig, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder()
                .user_agent(&config.user_agent)
                .timeout(timeout)
                .build()?,
            weather_url: config.weather_url.clone(),
            fema_url: config.fema_url.clone(),
            shelters_url: config.shelters_url.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FeedError> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/geo+json, application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        Ok(response.json::<T>().await?)
    }

    /// Active NWS alerts
    pub async fn fetch_weather_alerts(&self) -> Result<Vec<WeatherAlert>, FeedError> {
        let body: NwsResponse = self.get_json(&self.weather_url).await?;
        Ok(parse_alerts(body))
    }

    /// Most recent OpenFEMA disaster declarations
    pub async fn fetch_emergency_declarations(&self) -> Result<Vec<EmergencyAlert>, FeedError> {
        let body: FemaResponse = self.get_json(&self.fema_url).await?;
        Ok(parse_declarations(body))
    }

    /// Currently open shelters
    pub async fn fetch_shelters(&self) -> Result<Vec<Shelter>, FeedError> {
        let body: ArcGisResponse = self.get_json(&self.shelters_url).await?;
        parse_shelters(body)
    }
}
