//! Template rendering environment for Sprout.
//! Wraps a MiniJinja environment together with the reserved template suffix and the
//! globals installed by extensions.
use crate::error::Result;
use crate::extensions::Extension;
use indexmap::IndexMap;
use minijinja::{Environment, UndefinedBehavior, Value};
use serde::Serialize;

/// MiniJinja-based rendering environment shared by every stage of a run.
#[derive(Debug)]
pub struct TemplateEnv {
    env: Environment<'static>,
    suffix: String,
    globals: IndexMap<String, serde_json::Value>,
}

impl TemplateEnv {
    /// Creates a bare environment: strict undefined handling, trailing newlines kept.
    pub fn new(suffix: impl Into<String>) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        Self { env, suffix: suffix.into(), globals: IndexMap::new() }
    }

    /// Creates an environment with the given extensions installed, each at most once.
    /// An empty list installs the default extensions.
    pub fn with_extensions(suffix: impl Into<String>, extensions: &[Extension]) -> Self {
        let mut env = Self::new(suffix);
        let requested = if extensions.is_empty() { Extension::DEFAULTS } else { extensions };
        let mut applied = Vec::new();
        for extension in requested {
            if applied.contains(extension) {
                continue;
            }
            extension.install(&mut env);
            applied.push(*extension);
        }
        env
    }

    pub fn add_global(&mut self, name: &str, value: serde_json::Value) {
        self.env.add_global(name.to_string(), Value::from_serialize(&value));
        self.globals.insert(name.to_string(), value);
    }

    /// Globals installed through [`TemplateEnv::add_global`], in installation order.
    pub fn globals(&self) -> &IndexMap<String, serde_json::Value> {
        &self.globals
    }

    pub fn env_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Renders a template string with the given context.
    ///
    /// # Errors
    /// * `Error::RenderError` on syntax errors or undefined references
    pub fn render<S: Serialize>(&self, template: &str, context: S) -> Result<String> {
        Ok(self.env.render_str(template, context)?)
    }

    /// Evaluates a MiniJinja expression and returns its value.
    pub fn eval<S: Serialize>(&self, expression: &str, context: S) -> Result<Value> {
        let compiled = self.env.compile_expression_owned(expression.to_string())?;
        Ok(compiled.eval(context)?)
    }

    /// Whether a file name carries the reserved suffix with something in front of it.
    pub fn is_template_file(&self, file_name: &str) -> bool {
        file_name.len() > self.suffix.len() && file_name.ends_with(&self.suffix)
    }

    /// Strips the reserved suffix from a file name, if present.
    pub fn strip_suffix<'a>(&self, file_name: &'a str) -> &'a str {
        if self.is_template_file(file_name) {
            &file_name[..file_name.len() - self.suffix.len()]
        } else {
            file_name
        }
    }
}

/// Whether a path contains template syntax and must be rendered before use.
pub fn has_template_tokens(path: &str) -> bool {
    path.contains("{{") || path.contains("{%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_context() {
        let env = TemplateEnv::new(".jinja");
        let result = env.render("Hello {{ name }}!", serde_json::json!({"name": "test"})).unwrap();
        assert_eq!(result, "Hello test!");
    }

    #[test]
    fn test_undefined_reference_is_an_error() {
        let env = TemplateEnv::new(".jinja");
        assert!(env.render("{{ missing }}", serde_json::json!({})).is_err());
    }

    #[test]
    fn test_trailing_newline_kept() {
        let env = TemplateEnv::new(".jinja");
        assert_eq!(env.render("a\n", serde_json::json!({})).unwrap(), "a\n");
    }

    #[test]
    fn test_suffix_handling() {
        let env = TemplateEnv::new(".jinja");
        assert!(env.is_template_file("README.md.jinja"));
        assert!(!env.is_template_file(".jinja"));
        assert!(!env.is_template_file("README.md"));
        assert_eq!(env.strip_suffix("README.md.jinja"), "README.md");
        assert_eq!(env.strip_suffix("LICENSE"), "LICENSE");
    }

    #[test]
    fn test_has_template_tokens() {
        assert!(has_template_tokens("{{ package }}/__init__.py"));
        assert!(has_template_tokens("{% if ci %}.github{% endif %}"));
        assert!(!has_template_tokens("src/main.rs"));
    }
}
