//! Per-file gate deciding whether a candidate file is left out of the destination.

use minijinja::{Environment, UndefinedBehavior};

use crate::error::{Error, Result};
use crate::question::Answers;

/// Pure function of (relative path, answers). Evaluated once per candidate file.
///
/// Errors are fatal to the run: a wrong decision either way is worse than stopping.
pub trait SkipPredicate {
    fn should_skip(&self, path: &str, answers: &Answers) -> anyhow::Result<bool>;
}

impl<F> SkipPredicate for F
where
    F: Fn(&str, &Answers) -> anyhow::Result<bool>,
{
    fn should_skip(&self, path: &str, answers: &Answers) -> anyhow::Result<bool> {
        self(path, answers)
    }
}

/// Skip predicate written as a MiniJinja expression.
///
/// The expression sees `path` (relative, `/`-separated), `answers`, and every answer by its key.
/// Question keys cannot shadow `path` or `answers`, see [`crate::question::RESERVED_KEYS`].
///
/// ```yaml
/// should_skip_file: path == "LICENSE" and copyright_license == "None"
/// ```
#[derive(Debug)]
pub struct ExpressionSkip {
    expression: String,
    env: Environment<'static>,
}

impl ExpressionSkip {
    /// Compiles the expression once to reject syntax errors up front.
    ///
    /// # Errors
    /// * `Error::ManifestInvalid` naming `should_skip_file`
    pub fn new(expression: impl Into<String>) -> Result<Self> {
        let expression = expression.into();
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.compile_expression_owned(expression.clone())
            .map_err(|e| Error::manifest_invalid("should_skip_file", e))?;
        Ok(Self { expression, env })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }
}

impl SkipPredicate for ExpressionSkip {
    fn should_skip(&self, path: &str, answers: &Answers) -> anyhow::Result<bool> {
        let mut context = answers.to_json();
        context.insert("answers".to_string(), serde_json::Value::Object(answers.to_json()));
        context.insert("path".to_string(), path.into());

        let expression = self.env.compile_expression_owned(self.expression.clone())?;
        Ok(expression.eval(serde_json::Value::Object(context))?.is_true())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn license_answers(license: &str) -> Answers {
        [("copyright_license", license)].into_iter().collect()
    }

    #[test]
    fn test_expression_skip() {
        let skip = ExpressionSkip::new(r#"path == "LICENSE" and copyright_license == "None""#)
            .unwrap();
        assert!(skip.should_skip("LICENSE", &license_answers("None")).unwrap());
        assert!(!skip.should_skip("LICENSE", &license_answers("MIT")).unwrap());
        assert!(!skip.should_skip("README.md", &license_answers("None")).unwrap());
    }

    #[test]
    fn test_expression_sees_answers_mapping() {
        let skip = ExpressionSkip::new(r#"answers.copyright_license == "None""#).unwrap();
        assert!(skip.should_skip("anything", &license_answers("None")).unwrap());
    }

    #[test]
    fn test_invalid_expression_is_rejected() {
        match ExpressionSkip::new("path ==") {
            Err(Error::ManifestInvalid { symbol, .. }) => assert_eq!(symbol, "should_skip_file"),
            other => panic!("Expected ManifestInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_closure_predicate() {
        let skip = |path: &str, _: &Answers| -> anyhow::Result<bool> { Ok(path.ends_with(".bak")) };
        assert!(skip.should_skip("a.bak", &Answers::new()).unwrap());
    }
}
