use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::llm::ModelResponse;
use crate::shared::types::Priority;

/// How a location name was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Ai,
    Heuristic,
    None,
}

/// Result of pulling a place name out of free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationExtraction {
    pub location_name: Option<String>,
    pub confidence: f64,
    pub method: ExtractionMethod,
}

/// Authenticity verdict for a report image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageVerification {
    pub authentic: bool,
    pub confidence: f64,
    pub explanation: String,
    pub indicators: Vec<String>,
    /// True when the verdict is the configured default rather than a model answer
    pub is_fallback: bool,
}

// =============================================================================
// MODEL ANSWERS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub(super) struct LocationAnswer {
    /// Most specific place mentioned, null when there is none
    pub location_name: Option<String>,
    /// 0.0 to 1.0
    pub confidence: f64,
}

impl ModelResponse for LocationAnswer {
    fn fallback(_reason: &str) -> Self {
        Self {
            location_name: None,
            confidence: 0.0,
        }
    }

    fn is_plausible(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub(super) struct ImageAnswer {
    pub authentic: bool,
    /// 0.0 to 1.0
    pub confidence: f64,
    pub explanation: String,
    #[serde(default)]
    pub indicators: Vec<String>,
}

impl ModelResponse for ImageAnswer {
    fn fallback(reason: &str) -> Self {
        Self {
            authentic: true,
            confidence: 0.5,
            explanation: format!("Image could not be analysed: {}", reason),
            indicators: Vec::new(),
        }
    }

    fn is_plausible(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub(super) struct PriorityAnswer {
    pub priority: Priority,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ModelResponse for PriorityAnswer {
    fn fallback(_reason: &str) -> Self {
        Self {
            priority: Priority::Medium,
            reason: None,
        }
    }
}
