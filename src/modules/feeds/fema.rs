use serde::Deserialize;

use super::models::{parse_timestamp, EmergencyAlert};

#[derive(Debug, Deserialize)]
pub(super) struct FemaResponse {
    #[serde(rename = "DisasterDeclarationsSummaries", default)]
    declarations: Vec<FemaDeclaration>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FemaDeclaration {
    fema_declaration_string: Option<String>,
    disaster_number: Option<i64>,
    declaration_title: Option<String>,
    declaration_type: Option<String>,
    incident_type: Option<String>,
    state: Option<String>,
    designated_area: Option<String>,
    declaration_date: Option<String>,
}

/// Convert OpenFEMA summaries; rows without an identifier or title are skipped
pub(super) fn parse_declarations(body: FemaResponse) -> Vec<EmergencyAlert> {
    body.declarations
        .into_iter()
        .filter_map(|d| {
            let id = d
                .fema_declaration_string
                .or_else(|| d.disaster_number.map(|n| n.to_string()))?;
            let title = d.declaration_title.filter(|t| !t.trim().is_empty())?;
            Some(EmergencyAlert {
                id,
                title,
                declaration_type: d.declaration_type.unwrap_or_default(),
                incident_type: d.incident_type.unwrap_or_default(),
                state: d.state.unwrap_or_default(),
                designated_area: d.designated_area.unwrap_or_default(),
                declaration_date: parse_timestamp(d.declaration_date.as_deref()),
                disaster_id: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declarations() {
        let raw = r#"{
            "metadata": {"count": 2},
            "DisasterDeclarationsSummaries": [
                {
                    "femaDeclarationString": "DR-4700-NY",
                    "disasterNumber": 4700,
                    "declarationTitle": "SEVERE STORMS AND FLOODING",
                    "declarationType": "DR",
                    "incidentType": "Flood",
                    "state": "NY",
                    "designatedArea": "Kings (County)",
                    "declarationDate": "2025-01-14T00:00:00.000Z"
                },
                {"disasterNumber": 4701, "state": "CA"}
            ]
        }"#;
        let body: FemaResponse = serde_json::from_str(raw).unwrap();
        let alerts = parse_declarations(body);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, "DR-4700-NY");
        assert_eq!(alerts[0].incident_type, "Flood");
        assert!(alerts[0].declaration_date.is_some());
    }
}
