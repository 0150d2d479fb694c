//! Resolution of the question list, either static or computed once per run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::debug;

use crate::error::{Error, Result};
use crate::question::{check_questions, Question};
use crate::renderer::TemplateEnv;

/// Computes the question list from the environment and the destination.
///
/// Invoked exactly once, before any answer exists, so question structure
/// cannot depend on answers collected in the same run.
pub trait QuestionProvider {
    fn provide(&self, env: &TemplateEnv, destination: &Path) -> anyhow::Result<Vec<Question>>;
}

impl<F> QuestionProvider for F
where
    F: Fn(&TemplateEnv, &Path) -> anyhow::Result<Vec<Question>>,
{
    fn provide(&self, env: &TemplateEnv, destination: &Path) -> anyhow::Result<Vec<Question>> {
        self(env, destination)
    }
}

/// The two accepted shapes of the manifest's `questions` symbol.
pub enum QuestionSource {
    Static(Vec<Question>),
    Resolver(Box<dyn QuestionProvider>),
}

impl std::fmt::Debug for QuestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionSource::Static(questions) => f.debug_tuple("Static").field(questions).finish(),
            QuestionSource::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

/// Resolver backed by a template file that renders to a YAML or JSON question list.
///
/// The template sees the environment globals plus `destination`, `destination_name`
/// and `destination_exists`.
#[derive(Debug, Clone)]
pub struct TemplateQuestionProvider {
    path: PathBuf,
}

impl TemplateQuestionProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QuestionProvider for TemplateQuestionProvider {
    fn provide(&self, env: &TemplateEnv, destination: &Path) -> anyhow::Result<Vec<Question>> {
        let source = fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read resolver '{}'", self.path.display()))?;
        let context = serde_json::json!({
            "destination": destination.display().to_string(),
            "destination_name": destination
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            "destination_exists": destination.exists(),
        });
        let rendered = env.render(&source, context)?;

        let value: serde_json::Value = serde_yaml::from_str(&rendered)
            .with_context(|| format!("resolver '{}' did not produce YAML", self.path.display()))?;
        if !value.is_array() {
            anyhow::bail!("resolver must produce a sequence of questions");
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Produces the ordered question list to prompt.
///
/// # Arguments
/// * `source` - The manifest's `questions` symbol
/// * `env` - Rendering environment handed to resolvers
/// * `destination` - Destination path handed to resolvers
///
/// # Returns
/// * `Result<Vec<Question>>` - Questions in prompting order
///
/// # Errors
/// * `Error::QuestionResolutionError` if the resolver fails, or if the list (static or
///   computed) is malformed or repeats a key
pub fn resolve_questions(
    source: &QuestionSource,
    env: &TemplateEnv,
    destination: &Path,
) -> Result<Vec<Question>> {
    match source {
        QuestionSource::Static(questions) => {
            check_questions(questions).map_err(Error::QuestionResolutionError)?;
            Ok(questions.clone())
        }
        QuestionSource::Resolver(provider) => {
            debug!("Resolving questions for '{}'.", destination.display());
            let questions = provider
                .provide(env, destination)
                .map_err(|e| Error::QuestionResolutionError(format!("{e:#}")))?;
            check_questions(&questions).map_err(Error::QuestionResolutionError)?;
            Ok(questions)
        }
    }
}
