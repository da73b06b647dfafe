//! Tera-backed rendering of single template sources.

use std::collections::HashMap;
use std::error::Error as _;

use cleanarch_core::{
    application::{ApplicationError, ports::Bindings},
    domain::{ValidationResult, parsing},
    error::CleanArchResult,
};
use tera::{Context, Tera, Value};
use tracing::{debug, instrument};

/// Renders one template source at a time.
///
/// Every call builds its own engine so templates never see each other.
/// Autoescaping is off: the output is Java, YAML and Gradle, not HTML.
/// Two filters are registered on top of Tera's built-ins: `camel_case`
/// and `kebab_case`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeraRenderer;

impl TeraRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Compile `source` without rendering it.
    pub fn check(&self, id: &str, source: &str) -> ValidationResult {
        match engine(id, source) {
            Ok(_) => ValidationResult::success(),
            Err(e) => ValidationResult::failure(format!(
                "Template '{id}' has a syntax error: {}",
                describe(&e)
            )),
        }
    }

    #[instrument(skip(self, source, bindings), fields(bindings = bindings.len()))]
    pub fn render(&self, id: &str, source: &str, bindings: &Bindings) -> CleanArchResult<String> {
        let tera = engine(id, source).map_err(|e| ApplicationError::TemplateSyntax {
            id: id.to_string(),
            reason: describe(&e),
        })?;

        let context = Context::from_value(Value::Object(bindings.clone())).map_err(|e| {
            ApplicationError::Rendering {
                template: id.to_string(),
                reason: describe(&e),
            }
        })?;

        let output = tera
            .render(id, &context)
            .map_err(|e| ApplicationError::Rendering {
                template: id.to_string(),
                reason: describe(&e),
            })?;

        debug!(bytes = output.len(), "Template rendered");
        Ok(output)
    }
}

fn engine(id: &str, source: &str) -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.register_filter("camel_case", camel_case);
    tera.register_filter("kebab_case", kebab_case);
    tera.add_raw_template(id, source)?;
    Ok(tera)
}

/// Tera's top-level message is generic ("Failed to render 'x'"); the cause
/// sits further down the source chain.
fn describe(error: &tera::Error) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

fn camel_case(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = tera::try_get_value!("camel_case", "value", String, value);
    Ok(Value::String(parsing::to_camel_case(&text)))
}

fn kebab_case(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = tera::try_get_value!("kebab_case", "value", String, value);
    Ok(Value::String(parsing::to_kebab_case(&text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bindings(value: serde_json::Value) -> Bindings {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Bindings::new(),
        }
    }

    #[test]
    fn renders_nested_bindings_without_escaping() {
        let source = "package {{ packageName }};\n{% for f in fields %}{{ f.type }} {{ f.name }};\n{% endfor %}";
        let out = TeraRenderer::new()
            .render(
                "Entity.java.tera",
                source,
                &bindings(json!({
                    "packageName": "com.acme.domain",
                    "fields": [{ "name": "tags", "type": "List<String>" }],
                })),
            )
            .unwrap();

        assert_eq!(out, "package com.acme.domain;\nList<String> tags;\n");
    }

    #[test]
    fn case_filters() {
        let out = TeraRenderer::new()
            .render(
                "t",
                "{{ name | camel_case }} {{ name | kebab_case }}",
                &bindings(json!({ "name": "OrderCache" })),
            )
            .unwrap();
        assert_eq!(out, "orderCache order-cache");
    }

    #[test]
    fn check_reports_syntax_errors_with_cause() {
        let result = TeraRenderer::new().check("Broken.java.tera", "{% if x %}never closed");
        assert!(!result.is_valid());
        assert!(result.first_error().unwrap().contains("Broken.java.tera"));
    }

    #[test]
    fn undefined_variable_is_a_rendering_error() {
        let err = TeraRenderer::new()
            .render("t", "{{ missing }}", &Bindings::new())
            .unwrap_err();
        assert!(err.to_string().contains("Template rendering failed for 't'"));
        assert!(err.to_string().contains("missing"));
    }
}
