//! Prompt templates for the generative-AI adapter.
//!
//! Templates live in `templates/prompts/` and are embedded at compile time.

pub mod engine;

pub use engine::{render_template, TemplateError};

use minijinja::context;

/// Prompt asking the model to pull a place name out of free text
pub fn render_location_prompt(text: &str, json_schema: &str) -> Result<String, TemplateError> {
    render_template(
        "location_extraction.jinja",
        context! { text => text, json_schema => json_schema },
    )
}

/// Prompt asking the model to judge whether a disaster image is authentic
pub fn render_image_prompt(
    image_url: &str,
    context_text: Option<&str>,
    json_schema: &str,
) -> Result<String, TemplateError> {
    render_template(
        "image_verification.jinja",
        context! {
            image_url => image_url,
            context => context_text.unwrap_or(""),
            has_context => context_text.is_some(),
            json_schema => json_schema,
        },
    )
}

/// Prompt asking the model to rank a social post's urgency
pub fn render_priority_prompt(text: &str, json_schema: &str) -> Result<String, TemplateError> {
    render_template(
        "priority_classification.jinja",
        context! { text => text, json_schema => json_schema },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_prompt_includes_text_and_schema() {
        let prompt = render_location_prompt("Flooding near Main St", "{\"type\":\"object\"}")
            .unwrap();
        assert!(prompt.contains("Flooding near Main St"));
        assert!(prompt.contains("\"type\":\"object\""));
    }

    #[test]
    fn test_image_prompt_context_is_optional() {
        let without = render_image_prompt("https://img.example/a.jpg", None, "{}").unwrap();
        assert!(without.contains("https://img.example/a.jpg"));
        assert!(!without.contains("Reporter context"));

        let with = render_image_prompt("https://img.example/a.jpg", Some("flooded street"), "{}")
            .unwrap();
        assert!(with.contains("Reporter context: flooded street"));
    }
}
