//! Error handling for the Sprout application.
//! Defines the error taxonomy of a generation run and the result alias used throughout the crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Every fatal condition a generation run can end with.
///
/// A run either completes or reports exactly one of these. Only per-question input
/// validation is retried, and it surfaces here as `AnswerCollectionAborted` once the
/// retries are exhausted.
#[derive(Error, Debug)]
pub enum Error {
    /// No manifest file at the template source root.
    #[error("No manifest found in '{template_root}' (tried: {tried}).")]
    ManifestNotFound { template_root: String, tried: String },

    /// A recognised manifest symbol is missing or has the wrong shape.
    #[error("Invalid manifest symbol '{symbol}': {reason}.")]
    ManifestInvalid { symbol: String, reason: String },

    /// The question resolver failed or produced something other than a question list.
    #[error("Failed to resolve questions: {0}.")]
    QuestionResolutionError(String),

    /// Input ended, or retries were exhausted, while answering a question.
    #[error("Answer collection aborted at '{key}': {reason}.")]
    AnswerCollectionAborted { key: String, reason: String },

    /// The skip predicate could not be evaluated for a candidate file.
    #[error("Skip predicate failed for '{path}': {reason}.")]
    SkipPredicateError { path: String, reason: String },

    /// A custom generation strategy declared a parameter outside the collaborator pool.
    #[error("Unknown apply parameter '{parameter}'.")]
    UnknownApplyParameter { parameter: String },

    /// A generated file already exists and the run was not forced.
    #[error("Destination '{path}' already exists. Use --force to overwrite it.")]
    DestinationConflict { path: String },

    /// Underlying templating failure: syntax error or undefined reference.
    #[error("Render error: {0}.")]
    RenderError(#[from] minijinja::Error),

    /// Filesystem failure while writing output.
    #[error("Failed to write '{path}': {source}.")]
    WriteError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Custom generation logic reported a failure of its own.
    #[error("Apply failed: {0}.")]
    ApplyFailed(#[source] anyhow::Error),

    /// Represents errors that occur during file system operations.
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    #[error("Template does not exist: {template_dir}.")]
    TemplateDoesNotExistsError { template_dir: String },

    #[error("Cannot process the source path: '{source_path}'. Original error: {e}")]
    Git2Error {
        source_path: String,
        #[source]
        e: git2::Error,
    },

    /// Represents errors in processing ignore patterns.
    #[error("Ignore pattern error: {0}.")]
    IgnoreError(String),
}

impl Error {
    /// Shorthand for `ManifestInvalid`.
    pub fn manifest_invalid(symbol: impl Into<String>, reason: impl ToString) -> Self {
        Error::ManifestInvalid { symbol: symbol.into(), reason: reason.to_string() }
    }

    /// Shorthand for `WriteError` with the offending path.
    pub fn write_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::WriteError { path: path.into().display().to_string(), source }
    }
}

/// Convenience type alias for Results with Sprout's `Error` as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
