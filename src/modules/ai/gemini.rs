use std::time::Duration;

use async_trait::async_trait;
use base64::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Images larger than this are sent by URL only
const MAX_INLINE_IMAGE_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Gemini returned no text candidates")]
    EmptyResponse,
}

/// Image bytes attached to a prompt
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Text generation seam so the service can be driven without the network
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str, image: Option<ImageInput>) -> Result<String, GeminiError>;

    /// Download an image so it can be inlined into a prompt
    async fn fetch_image(&self, _url: &str) -> Option<ImageInput> {
        None
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| match p {
                Part::Text { text } => Some(text),
                Part::InlineData { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("");
        (!text.trim().is_empty()).then_some(text)
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Gemini `generateContent` client
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        api_key: &str,
        base_url: &str,
        model: &str,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder().timeout(timeout).build()?,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str, image: Option<ImageInput>) -> Result<String, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let mut parts = vec![Part::Text {
            text: prompt.to_string(),
        }];
        if let Some(image) = image {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type,
                    data: BASE64_STANDARD.encode(&image.data),
                },
            });
        }

        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                temperature: 0.1,
                response_mime_type: "application/json",
            },
        };

        tracing::debug!(model = %self.model, "Gemini generateContent request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status, body });
        }

        response
            .json::<GenerateContentResponse>()
            .await?
            .text()
            .ok_or(GeminiError::EmptyResponse)
    }

    async fn fetch_image(&self, url: &str) -> Option<ImageInput> {
        let response = match self.http.get(url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::warn!("Image fetch returned status {} for {}", r.status(), url);
                return None;
            }
            Err(e) => {
                tracing::warn!("Image fetch failed for {}: {}", url, e);
                return None;
            }
        };

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| v.starts_with("image/"))?;

        let data = response.bytes().await.ok()?;
        if data.len() > MAX_INLINE_IMAGE_BYTES {
            tracing::debug!("Image too large to inline ({} bytes): {}", data.len(), url);
            return None;
        }

        Some(ImageInput {
            mime_type,
            data: data.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_joins_parts() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"a\":"}, {"text": " 1}"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text().as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(parsed.text().is_none());
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: "hi".into() },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".into(),
                            data: "AA==".into(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.1,
                response_mime_type: "application/json",
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            value["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
    }
}
