//! Tolerant parsing of generative-model output into typed responses.

mod parser;
mod response;

pub use parser::{extract_json_block, parse_model_output};
pub use response::ModelResponse;
