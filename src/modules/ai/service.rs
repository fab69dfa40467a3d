use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};

use super::gemini::GenerativeModel;
use super::heuristics::extract_location_heuristic;
use super::models::{
    ExtractionMethod, ImageAnswer, ImageVerification, LocationAnswer, LocationExtraction,
    PriorityAnswer,
};
use crate::modules::cache::CacheService;
use crate::shared::constants::{
    CACHE_PREFIX_AI_IMAGE, CACHE_PREFIX_AI_LOCATION, CACHE_PREFIX_AI_PRIORITY,
};
use crate::shared::llm::{parse_model_output, ModelResponse};
use crate::shared::prompts;
use crate::shared::types::Priority;

/// Confidence reported for heuristic location matches
const HEURISTIC_CONFIDENCE: f64 = 0.4;

/// Cached front for the generative model.
///
/// Without a model (no API key) every operation goes straight to its fallback.
pub struct AiService {
    model: Option<Arc<dyn GenerativeModel>>,
    cache: Arc<CacheService>,
    cache_ttl: Duration,
    fail_open: bool,
}

/// SHA-256 hex digest of the input parts, used as the cache key suffix
fn hash_key(prefix: &str, parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    format!("{}:{}", prefix, hex::encode(hasher.finalize()))
}

impl AiService {
    pub fn new(
        model: Option<Arc<dyn GenerativeModel>>,
        cache: Arc<CacheService>,
        cache_ttl: Duration,
        fail_open: bool,
    ) -> Self {
        Self {
            model,
            cache,
            cache_ttl,
            fail_open,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    /// Run a prompt and parse the answer. `None` means no usable model answer.
    async fn ask<T: ModelResponse>(
        &self,
        prompt: Result<String, prompts::TemplateError>,
        image_url: Option<&str>,
    ) -> Option<T> {
        let model = self.model.as_ref()?;

        let prompt = match prompt {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("Failed to render prompt: {:?}", e);
                return None;
            }
        };

        let image = match image_url {
            Some(url) => model.fetch_image(url).await,
            None => None,
        };

        let text = match model.generate(&prompt, image).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Gemini request failed: {}", e);
                return None;
            }
        };

        let (answer, used_fallback) = parse_model_output::<T>(&text);
        (!used_fallback).then_some(answer)
    }

    /// Extract a place name from free text.
    ///
    /// Order: cached answer, model answer, regex heuristic, nothing.
    pub async fn extract_location(&self, text: &str) -> LocationExtraction {
        let key = hash_key(CACHE_PREFIX_AI_LOCATION, &[text]);
        if let Some(cached) = self.cache.get_json::<LocationExtraction>(&key).await {
            return cached;
        }

        let schema = LocationAnswer::json_schema_string();
        let answer = self
            .ask::<LocationAnswer>(prompts::render_location_prompt(text, &schema), None)
            .await;

        if let Some(answer) = answer {
            let location_name = answer
                .location_name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty());
            if location_name.is_some() {
                let result = LocationExtraction {
                    location_name,
                    confidence: answer.confidence,
                    method: ExtractionMethod::Ai,
                };
                self.cache.set_json(&key, &result, self.cache_ttl).await;
                return result;
            }
        }

        match extract_location_heuristic(text) {
            Some(name) => LocationExtraction {
                location_name: Some(name),
                confidence: HEURISTIC_CONFIDENCE,
                method: ExtractionMethod::Heuristic,
            },
            None => LocationExtraction {
                location_name: None,
                confidence: 0.0,
                method: ExtractionMethod::None,
            },
        }
    }

    /// Judge whether an image is authentic.
    ///
    /// Unverifiable images get the configured fail-open verdict with confidence 0.5.
    pub async fn verify_image(&self, image_url: &str, context: Option<&str>) -> ImageVerification {
        let key = hash_key(CACHE_PREFIX_AI_IMAGE, &[image_url, context.unwrap_or("")]);
        if let Some(cached) = self.cache.get_json::<ImageVerification>(&key).await {
            return cached;
        }

        let schema = ImageAnswer::json_schema_string();
        let answer = self
            .ask::<ImageAnswer>(
                prompts::render_image_prompt(image_url, context, &schema),
                Some(image_url),
            )
            .await;

        match answer {
            Some(answer) => {
                let result = ImageVerification {
                    authentic: answer.authentic,
                    confidence: answer.confidence,
                    explanation: answer.explanation,
                    indicators: answer.indicators,
                    is_fallback: false,
                };
                self.cache.set_json(&key, &result, self.cache_ttl).await;
                result
            }
            None => self.fallback_verification(),
        }
    }

    fn fallback_verification(&self) -> ImageVerification {
        let reason = if self.is_enabled() {
            "verification service unavailable"
        } else {
            "verification service not configured"
        };
        let base = ImageAnswer::fallback(reason);
        ImageVerification {
            authentic: self.fail_open,
            confidence: base.confidence,
            explanation: base.explanation,
            indicators: base.indicators,
            is_fallback: true,
        }
    }

    /// Rank the urgency of a post; unclassifiable text is medium
    pub async fn classify_priority(&self, text: &str) -> Priority {
        let key = hash_key(CACHE_PREFIX_AI_PRIORITY, &[text]);
        if let Some(cached) = self.cache.get_json::<Priority>(&key).await {
            return cached;
        }

        let schema = PriorityAnswer::json_schema_string();
        match self
            .ask::<PriorityAnswer>(prompts::render_priority_prompt(text, &schema), None)
            .await
        {
            Some(answer) => {
                self.cache
                    .set_json(&key, &answer.priority, self.cache_ttl)
                    .await;
                answer.priority
            }
            None => PriorityAnswer::fallback("no model answer").priority,
        }
    }
}
