//! Template renderer using Tera for Jinja2-style template rendering
use super::embedded;
use crate::error::{PodstackError, Result};
use std::collections::HashMap;
use tera::{Context, Tera, Value};

/// Single-quoted YAML scalar. Every character inside is literal.
pub fn yaml_quote_str(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Like [`yaml_quote_str`], with `$` doubled so compose does not interpolate it.
pub fn compose_quote_str(value: &str) -> String {
    yaml_quote_str(&value.replace('$', "$$"))
}

fn yaml_quote(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = tera::try_get_value!("yaml_quote", "value", String, value);
    Ok(Value::String(yaml_quote_str(&s)))
}

fn compose_quote(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = tera::try_get_value!("compose_quote", "value", String, value);
    Ok(Value::String(compose_quote_str(&s)))
}

pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a TemplateRenderer from the templates compiled into the binary.
    pub fn from_embedded() -> Result<Self> {
        tracing::debug!("[TemplateRenderer] Initializing Tera from embedded templates");

        let mut tera = Tera::default();
        // Output is config files, never HTML
        tera.autoescape_on(vec![]);
        tera.register_filter("yaml_quote", yaml_quote);
        tera.register_filter("compose_quote", compose_quote);
        tera.add_raw_templates(embedded::ALL_TEMPLATES.iter().copied())?;

        tracing::debug!(
            "[TemplateRenderer] Loaded {} embedded templates",
            embedded::ALL_TEMPLATES.len()
        );

        Ok(Self { tera })
    }

    /// Render a template with a Tera context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        if !self.has_template(template_name) {
            return Err(PodstackError::template(format!(
                "unknown template '{}'",
                template_name
            )));
        }

        let rendered = self.tera.render(template_name, context).map_err(|e| {
            let err: PodstackError = e.into();
            PodstackError::template(format!("failed to render {}: {}", template_name, err))
        })?;

        tracing::debug!(
            "[TemplateRenderer] Rendered template {} ({} bytes)",
            template_name,
            rendered.len()
        );

        Ok(rendered)
    }

    /// Whether a template of this name is registered
    pub fn has_template(&self, template_name: &str) -> bool {
        self.tera.get_template_names().any(|name| name == template_name)
    }

    /// List all loaded template names, sorted
    pub fn list_templates(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tera.get_template_names().map(String::from).collect();
        names.sort();
        names
    }
}
