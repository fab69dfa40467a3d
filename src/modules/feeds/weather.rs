use serde::Deserialize;

use super::models::{parse_timestamp, WeatherAlert};

#[derive(Debug, Deserialize)]
pub(super) struct NwsResponse {
    #[serde(default)]
    features: Vec<NwsFeature>,
}

#[derive(Debug, Deserialize)]
struct NwsFeature {
    id: Option<String>,
    properties: Option<NwsProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NwsProperties {
    id: Option<String>,
    event: Option<String>,
    headline: Option<String>,
    severity: Option<String>,
    urgency: Option<String>,
    area_desc: Option<String>,
    effective: Option<String>,
    expires: Option<String>,
}

/// Convert the GeoJSON collection; features without an id or event are skipped
pub(super) fn parse_alerts(body: NwsResponse) -> Vec<WeatherAlert> {
    body.features
        .into_iter()
        .filter_map(|feature| {
            let props = feature.properties?;
            let id = props.id.or(feature.id)?;
            let event = props.event.filter(|e| !e.trim().is_empty())?;
            Some(WeatherAlert {
                id,
                event,
                headline: props.headline,
                severity: props.severity.unwrap_or_else(|| "Unknown".to_string()),
                urgency: props.urgency.unwrap_or_else(|| "Unknown".to_string()),
                area_description: props.area_desc.unwrap_or_default(),
                effective: parse_timestamp(props.effective.as_deref()),
                expires: parse_timestamp(props.expires.as_deref()),
                disaster_id: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alerts_skips_malformed_features() {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "id": "https://api.weather.gov/alerts/urn:1",
                    "properties": {
                        "id": "urn:1",
                        "event": "Flash Flood Warning",
                        "headline": "Flash Flood Warning issued for New York County",
                        "severity": "Severe",
                        "urgency": "Immediate",
                        "areaDesc": "New York, NY; Kings, NY",
                        "effective": "2025-01-15T10:00:00-05:00",
                        "expires": "2025-01-15T18:00:00-05:00"
                    }
                },
                {"id": "urn:2", "properties": {"severity": "Minor"}},
                {"id": "urn:3"}
            ]
        }"#;
        let body: NwsResponse = serde_json::from_str(raw).unwrap();
        let alerts = parse_alerts(body);

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.id, "urn:1");
        assert_eq!(alert.area_description, "New York, NY; Kings, NY");
        assert_eq!(
            alert.effective.unwrap().to_rfc3339(),
            "2025-01-15T15:00:00+00:00"
        );
    }
}
