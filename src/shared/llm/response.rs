use schemars::gen::SchemaGenerator;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// A typed model answer with a well-defined fallback value.
///
/// When the upstream call fails or its text cannot be parsed, callers get
/// `fallback(reason)` instead of an error.
pub trait ModelResponse: DeserializeOwned + JsonSchema + Sized {
    /// Value used when no usable answer is available
    fn fallback(reason: &str) -> Self;

    /// Reject answers that parse but make no sense (out-of-range scores, etc.)
    fn is_plausible(&self) -> bool {
        true
    }

    /// JSON schema string embedded in prompts
    fn json_schema_string() -> String {
        let mut gen = SchemaGenerator::default();
        let schema = gen.root_schema_for::<Self>();
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
    }
}
