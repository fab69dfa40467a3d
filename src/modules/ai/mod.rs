//! Generative-AI adapter: location extraction, image verification and
//! priority classification, all cached and all with a fixed fallback.

mod gemini;
mod heuristics;
mod models;
mod service;

pub use gemini::{GeminiClient, GeminiError, GenerativeModel, ImageInput};
pub use heuristics::extract_location_heuristic;
pub use models::{ExtractionMethod, ImageVerification, LocationExtraction};
pub use service::AiService;
