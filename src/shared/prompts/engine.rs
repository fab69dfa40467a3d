//! Prompt rendering over templates compiled into the binary.

use minijinja::{Environment, Value};
use std::sync::OnceLock;
use thiserror::Error;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// (name, source) of every prompt template
const TEMPLATES: &[(&str, &str)] = &[
    (
        "location_extraction.jinja",
        include_str!("../../../templates/prompts/location_extraction.jinja"),
    ),
    (
        "image_verification.jinja",
        include_str!("../../../templates/prompts/image_verification.jinja"),
    ),
    (
        "priority_classification.jinja",
        include_str!("../../../templates/prompts/priority_classification.jinja"),
    ),
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    for &(name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        }
    }
    env
}

fn environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a named template with a `minijinja::context!` value
pub fn render_template(template_name: &str, ctx: Value) -> Result<String, TemplateError> {
    let template = environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_templates_load() {
        for &(name, _) in TEMPLATES {
            assert!(environment().get_template(name).is_ok(), "{} failed", name);
        }
    }

    #[test]
    fn test_unknown_template() {
        let err = render_template("missing.jinja", context! {}).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }
}
