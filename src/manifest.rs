//! Manifest loading for Sprout templates.
//! Reads the manifest file at the template source root and validates every recognised
//! symbol individually, so a bad shape is reported under the symbol's name.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::apply::{Capabilities, CommandStrategy, GenerationStrategy};
use crate::constants::{DEFAULT_TEMPLATE_DIR, DEFAULT_TEMPLATE_SUFFIX, MANIFEST_FILES};
use crate::error::{Error, Result};
use crate::extensions::Extension;
use crate::question::{check_questions, Question};
use crate::resolver::{QuestionSource, TemplateQuestionProvider};
use crate::skip::{ExpressionSkip, SkipPredicate};
use crate::style::Style;

type Symbols = serde_json::Map<String, serde_json::Value>;

/// Text shown before the first question.
pub enum Title {
    /// Printed verbatim.
    Text(String),
    /// Rendered with the environment globals, `destination` and `template_dir`.
    Template(String),
    Computed(Box<dyn Fn() -> String>),
}

impl fmt::Debug for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Title::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Title::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Title::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// The validated symbol table of a template.
pub struct Manifest {
    pub questions: QuestionSource,
    /// Relative to the template source root unless absolute.
    pub template_dir: PathBuf,
    pub template_suffix: String,
    pub ignore: Vec<String>,
    pub should_skip_file: Option<Box<dyn SkipPredicate>>,
    pub style: Style,
    /// Empty means the default extensions.
    pub extensions: Vec<Extension>,
    pub title: Option<Title>,
    pub apply: Option<Box<dyn GenerationStrategy>>,
}

impl Manifest {
    /// Manifest with the given questions and every optional symbol at its default.
    pub fn new(questions: QuestionSource) -> Self {
        Self {
            questions,
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            template_suffix: DEFAULT_TEMPLATE_SUFFIX.to_string(),
            ignore: Vec::new(),
            should_skip_file: None,
            style: Style::default(),
            extensions: Vec::new(),
            title: None,
            apply: None,
        }
    }

    /// Absolute template directory for a given source root.
    pub fn template_dir_in(&self, template_root: &Path) -> PathBuf {
        template_root.join(&self.template_dir)
    }
}

impl fmt::Debug for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manifest")
            .field("questions", &self.questions)
            .field("template_dir", &self.template_dir)
            .field("template_suffix", &self.template_suffix)
            .field("ignore", &self.ignore)
            .field("should_skip_file", &self.should_skip_file.is_some())
            .field("style", &self.style)
            .field("extensions", &self.extensions)
            .field("title", &self.title)
            .field("apply", &self.apply.as_ref().map(|a| a.parameters().join(",")))
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ResolverDecl {
    resolver: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TitleDecl {
    Text(String),
    Template { template: String },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ApplyDecl {
    uses: Vec<String>,
    command: Vec<String>,
}

/// Finds the manifest file at the template source root.
///
/// # Errors
/// * `Error::ManifestNotFound` if none of [`MANIFEST_FILES`] exists
pub fn find_manifest(template_root: &Path) -> Result<PathBuf> {
    MANIFEST_FILES
        .iter()
        .map(|name| template_root.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| Error::ManifestNotFound {
            template_root: template_root.display().to_string(),
            tried: MANIFEST_FILES.join(", "),
        })
}

/// Loads and validates the manifest at the template source root.
///
/// # Arguments
/// * `template_root` - Root directory of the template source
///
/// # Returns
/// * `Result<Manifest>` - The validated manifest
///
/// # Errors
/// * `Error::ManifestNotFound` if there is no manifest file
/// * `Error::ManifestInvalid` naming the first symbol that is missing or malformed
/// * `Error::UnknownApplyParameter` if `apply.uses` names something outside the pool
pub fn load_manifest(template_root: &Path) -> Result<Manifest> {
    let path = find_manifest(template_root)?;
    debug!("Loading manifest from {}", path.display());
    let content = fs::read_to_string(&path)?;
    parse_manifest(&content, template_root)
}

/// Parses manifest content. Relative paths inside it resolve against `template_root`.
pub fn parse_manifest(content: &str, template_root: &Path) -> Result<Manifest> {
    let raw: serde_json::Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::manifest_invalid("manifest", format!("invalid format: {e}")))?,
    };
    let serde_json::Value::Object(symbols) = raw else {
        return Err(Error::manifest_invalid("manifest", "expected a mapping of symbols"));
    };

    let mut manifest = Manifest::new(parse_questions(&symbols, template_root)?);

    if let Some(template_dir) = symbol::<PathBuf>(&symbols, "template_dir")? {
        manifest.template_dir = template_dir;
    }
    if let Some(suffix) = symbol::<String>(&symbols, "template_suffix")? {
        if suffix.is_empty() {
            return Err(Error::manifest_invalid("template_suffix", "must not be empty"));
        }
        manifest.template_suffix = suffix;
    }
    if let Some(ignore) = symbol::<Vec<String>>(&symbols, "ignore")? {
        manifest.ignore = ignore;
    }
    if let Some(expression) = symbol::<String>(&symbols, "should_skip_file")? {
        manifest.should_skip_file = Some(Box::new(ExpressionSkip::new(expression)?));
    }
    if let Some(style) = symbol::<Style>(&symbols, "style")? {
        manifest.style = style;
    }
    if let Some(names) = symbol::<Vec<String>>(&symbols, "extensions")? {
        manifest.extensions = names
            .iter()
            .map(|name| name.parse::<Extension>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::manifest_invalid("extensions", e))?;
    }
    if let Some(title) = symbol::<TitleDecl>(&symbols, "title")? {
        manifest.title = Some(match title {
            TitleDecl::Text(text) => Title::Text(text),
            TitleDecl::Template { template } => Title::Template(template),
        });
    }
    if let Some(apply) = symbol::<ApplyDecl>(&symbols, "apply")? {
        if apply.command.is_empty() {
            return Err(Error::manifest_invalid("apply", "command must not be empty"));
        }
        Capabilities::parse(&apply.uses)?;
        manifest.apply =
            Some(Box::new(CommandStrategy::new(apply.uses, apply.command, template_root)));
    }

    Ok(manifest)
}

/// Deserializes an optional symbol, naming it on failure. `null` counts as absent.
fn symbol<T: DeserializeOwned>(symbols: &Symbols, name: &str) -> Result<Option<T>> {
    match symbols.get(name) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| Error::manifest_invalid(name, e)),
    }
}

fn parse_questions(symbols: &Symbols, template_root: &Path) -> Result<QuestionSource> {
    let invalid = |reason: String| Error::manifest_invalid("questions", reason);
    match symbols.get("questions") {
        None | Some(serde_json::Value::Null) => Err(invalid("required symbol is missing".into())),
        Some(value @ serde_json::Value::Array(_)) => {
            let questions: Vec<Question> =
                serde_json::from_value(value.clone()).map_err(|e| invalid(e.to_string()))?;
            check_questions(&questions).map_err(invalid)?;
            Ok(QuestionSource::Static(questions))
        }
        Some(value @ serde_json::Value::Object(_)) => {
            let decl: ResolverDecl =
                serde_json::from_value(value.clone()).map_err(|e| invalid(e.to_string()))?;
            let path = template_root.join(&decl.resolver);
            if !path.is_file() {
                return Err(invalid(format!("resolver '{}' does not exist", path.display())));
            }
            Ok(QuestionSource::Resolver(Box::new(TemplateQuestionProvider::new(path))))
        }
        Some(_) => Err(invalid(
            "expected a sequence of questions or a mapping with a `resolver`".into(),
        )),
    }
}
