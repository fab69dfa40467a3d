pub mod constants;
pub mod correlation;
pub mod geo;
pub mod llm;
pub mod prompts;
pub mod test_helpers;
pub mod types;
pub mod validation;
