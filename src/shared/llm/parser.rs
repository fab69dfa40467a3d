use lazy_static::lazy_static;
use regex::Regex;

use super::ModelResponse;

lazy_static! {
    /// Trailing commas before } or ]
    static ref TRAILING_COMMA_RE: Regex = Regex::new(r",(\s*[}\]])").unwrap();

    /// Fenced code block, optionally tagged with a language
    static ref FENCED_BLOCK_RE: Regex = Regex::new(r"(?s)```[a-zA-Z]*\s*\n?(.*?)```").unwrap();
}

/// Pull the JSON object out of free-form model text.
///
/// Accepts a fenced block (```json or bare ```), a plain object, or an object
/// embedded in prose (first `{` to last `}`).
pub fn extract_json_block(text: &str) -> Option<String> {
    if let Some(caps) = FENCED_BLOCK_RE.captures(text) {
        let inner = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        if inner.starts_with('{') {
            return Some(inner.to_string());
        }
    }

    let trimmed = text.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed.to_string());
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| text[start..=end].to_string())
}

fn strip_trailing_commas(json: &str) -> String {
    TRAILING_COMMA_RE.replace_all(json, "$1").to_string()
}

fn repair(json: &str) -> Option<String> {
    let options = llm_json::RepairOptions::default();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        llm_json::repair_json(json, &options)
    }));

    match result {
        Ok(Ok(repaired)) => Some(repaired),
        Ok(Err(e)) => {
            tracing::debug!("Model JSON repair failed: {:?}", e);
            None
        }
        Err(_) => {
            tracing::warn!("Model JSON repair panicked");
            None
        }
    }
}

fn try_parse<T: ModelResponse>(text: &str) -> Result<T, String> {
    let json = extract_json_block(text).ok_or_else(|| "No JSON object in model output".to_string())?;

    let attempts = [Some(json.clone()), Some(strip_trailing_commas(&json)), repair(&json)];
    for candidate in attempts.into_iter().flatten() {
        if let Ok(parsed) = serde_json::from_str::<T>(&candidate) {
            if parsed.is_plausible() {
                return Ok(parsed);
            }
            return Err("Model output failed plausibility check".to_string());
        }
    }

    Err(format!(
        "Unparseable model output: {}",
        json.chars().take(200).collect::<String>()
    ))
}

/// Parse model text into `T`, substituting `T::fallback` on any failure.
///
/// The boolean is true when the fallback was used.
pub fn parse_model_output<T: ModelResponse>(text: &str) -> (T, bool) {
    match try_parse::<T>(text) {
        Ok(parsed) => (parsed, false),
        Err(reason) => {
            tracing::warn!("Model response parsing failed, using fallback: {}", reason);
            (T::fallback(&reason), true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, JsonSchema)]
    struct Extraction {
        location_name: Option<String>,
        confidence: f64,
    }

    impl ModelResponse for Extraction {
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

    #[test]
    fn test_extract_from_fenced_block() {
        let text = "Here you go:\n```json\n{\"location_name\": \"Main St\", \"confidence\": 0.9}\n```\nDone.";
        let json = extract_json_block(text).unwrap();
        assert!(json.starts_with('{') && json.ends_with('}'));
        assert!(json.contains("Main St"));
    }

    #[test]
    fn test_extract_from_bare_fence_and_prose() {
        let fenced = "```\n{\"confidence\": 1}\n```";
        assert_eq!(extract_json_block(fenced).unwrap(), "{\"confidence\": 1}");

        let prose = "The answer is {\"confidence\": 0.5} as requested";
        assert_eq!(extract_json_block(prose).unwrap(), "{\"confidence\": 0.5}");

        assert!(extract_json_block("no json here").is_none());
    }

    #[test]
    fn test_strip_trailing_commas() {
        assert_eq!(
            strip_trailing_commas(r#"{"a": [1, 2,], "b": {"c": true,},}"#),
            r#"{"a": [1, 2], "b": {"c": true}}"#
        );
    }

    #[test]
    fn test_parse_valid_output() {
        let (parsed, used_fallback): (Extraction, bool) =
            parse_model_output(r#"{"location_name": "Brooklyn, NY", "confidence": 0.8}"#);
        assert!(!used_fallback);
        assert_eq!(parsed.location_name.as_deref(), Some("Brooklyn, NY"));
    }

    #[test]
    fn test_parse_with_trailing_comma() {
        let (parsed, used_fallback): (Extraction, bool) =
            parse_model_output(r#"{"location_name": "Queens", "confidence": 0.7,}"#);
        assert!(!used_fallback);
        assert_eq!(parsed.location_name.as_deref(), Some("Queens"));
    }

    #[test]
    fn test_parse_garbage_uses_fallback() {
        let (parsed, used_fallback): (Extraction, bool) =
            parse_model_output("I could not find a location.");
        assert!(used_fallback);
        assert!(parsed.location_name.is_none());
    }

    #[test]
    fn test_implausible_answer_uses_fallback() {
        let (parsed, used_fallback): (Extraction, bool) =
            parse_model_output(r#"{"location_name": "Mars", "confidence": 7.5}"#);
        assert!(used_fallback);
        assert_eq!(parsed.confidence, 0.0);
    }

    #[test]
    fn test_schema_mentions_fields() {
        let schema = Extraction::json_schema_string();
        assert!(schema.contains("location_name"));
        assert!(schema.contains("confidence"));
    }
}
