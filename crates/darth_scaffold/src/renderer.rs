//! Template rendering.
//!
//! The pipeline only needs `render(name, context) -> text`; any engine that
//! can do that implements [`TemplateRenderer`]. [`HandlebarsRenderer`] is the
//! default and ships the CDK templates inside the binary.

use handlebars::{no_escape, Handlebars};
use serde_json::Value;
use tracing::debug;

use crate::error::{RenderError, ScaffoldError, ScaffoldResult};

/// Renders a named template against a JSON context.
pub trait TemplateRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String, RenderError>;
}

impl<R: TemplateRenderer + ?Sized> TemplateRenderer for &R {
    fn render(&self, template: &str, context: &Value) -> Result<String, RenderError> {
        (**self).render(template, context)
    }
}

/// Built-in template set, keyed by template name.
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("app.py", include_str!("../templates/app.py.hbs")),
    ("cdk.json", include_str!("../templates/cdk.json.hbs")),
    ("pyproject.toml", include_str!("../templates/pyproject.toml.hbs")),
    ("README.md", include_str!("../templates/README.md.hbs")),
    ("stacks/__init__.py", include_str!("../templates/stacks/__init__.py.hbs")),
    ("stacks/main_stack.py", include_str!("../templates/stacks/main_stack.py.hbs")),
    (
        "stacks/constructs/__init__.py",
        include_str!("../templates/stacks/constructs/__init__.py.hbs"),
    ),
    (
        "stacks/constructs/ecr_repository.py",
        include_str!("../templates/stacks/constructs/ecr_repository.py.hbs"),
    ),
    (
        "stacks/constructs/ecs_service.py",
        include_str!("../templates/stacks/constructs/ecs_service.py.hbs"),
    ),
    (
        "stacks/constructs/alb.py",
        include_str!("../templates/stacks/constructs/alb.py.hbs"),
    ),
    (
        "stacks/constructs/secrets.py",
        include_str!("../templates/stacks/constructs/secrets.py.hbs"),
    ),
    (
        "stacks/constructs/rds_database.py",
        include_str!("../templates/stacks/constructs/rds_database.py.hbs"),
    ),
    (
        "stacks/constructs/s3_bucket.py",
        include_str!("../templates/stacks/constructs/s3_bucket.py.hbs"),
    ),
    (
        "stacks/constructs/cloudfront_distribution.py",
        include_str!("../templates/stacks/constructs/cloudfront_distribution.py.hbs"),
    ),
];

/// Handlebars-backed renderer.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Create a renderer loaded with the built-in templates.
    pub fn new() -> ScaffoldResult<Self> {
        let mut renderer = Self::empty();
        for (name, source) in BUILTIN_TEMPLATES {
            renderer.register(name, source)?;
        }
        Ok(renderer)
    }

    /// Create a renderer with helpers but no templates.
    pub fn empty() -> Self {
        let mut registry = Handlebars::new();
        // Output is source code, not HTML.
        registry.register_escape_fn(no_escape);

        registry.register_helper("snake_case", Box::new(snake_case_helper));
        registry.register_helper("pascal_case", Box::new(pascal_case_helper));
        registry.register_helper("upper_snake_case", Box::new(upper_snake_case_helper));
        registry.register_helper("json", Box::new(json_helper));
        registry.register_helper("py", Box::new(py_helper));

        Self { registry }
    }

    /// Register or replace a template.
    pub fn register(&mut self, name: &str, source: &str) -> ScaffoldResult<()> {
        debug!("Registering template {}", name);
        self.registry
            .register_template_string(name, source)
            .map_err(|e| ScaffoldError::Render {
                template: name.to_string(),
                source: Box::new(e),
            })
    }

    pub fn with_template(mut self, name: &str, source: &str) -> ScaffoldResult<Self> {
        self.register(name, source)?;
        Ok(self)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String, RenderError> {
        Ok(self.registry.render(template, context)?)
    }
}

/// Convert to snake_case.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_lower = false;
    for c in s.chars() {
        if c == '-' || c == ' ' || c == '_' || c == '.' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            result.push('_');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        result.extend(c.to_lowercase());
    }
    result.trim_end_matches('_').to_string()
}

/// Convert to PascalCase.
pub fn to_pascal_case(s: &str) -> String {
    s.split(['-', '_', ' ', '.'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

/// Render a JSON value as a Python literal.
pub fn to_python_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        // JSON string escapes are valid Python string escapes.
        Value::String(_) => value.to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(to_python_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", Value::String(k.clone()), to_python_literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

// Handlebars helpers

fn str_param<'a>(h: &'a handlebars::Helper) -> &'a str {
    h.param(0).and_then(|v| v.value().as_str()).unwrap_or("")
}

fn snake_case_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    out.write(&to_snake_case(str_param(h)))?;
    Ok(())
}

fn pascal_case_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    out.write(&to_pascal_case(str_param(h)))?;
    Ok(())
}

fn upper_snake_case_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    out.write(&to_snake_case(str_param(h)).to_uppercase())?;
    Ok(())
}

fn json_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    if let Some(v) = h.param(0) {
        out.write(&serde_json::to_string(v.value()).unwrap_or_default())?;
    }
    Ok(())
}

fn py_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let literal = h
        .param(0)
        .map(|v| to_python_literal(v.value()))
        .unwrap_or_else(|| "None".to_string());
    out.write(&literal)?;
    Ok(())
}
