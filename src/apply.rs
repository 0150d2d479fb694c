//! Generation dispatch: the default render pass, or a custom strategy bound by parameter name
//! to exactly the collaborators it declares.

use std::collections::BTreeSet;
use std::fmt;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use anyhow::Context;
use log::debug;
use serde::Serialize;

use crate::context::{Console, RenderContext};
use crate::error::{Error, Result};
use crate::processor::{ensure_destination, FileStatus, Processor};
use crate::question::Answers;
use crate::renderer::TemplateEnv;
use crate::style::Style;

/// Member of the fixed collaborator pool a custom strategy can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Env,
    TemplateDir,
    TemplateRoot,
    Destination,
    Answers,
    Style,
    Console,
    RenderTemplates,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::Env,
        Capability::TemplateDir,
        Capability::TemplateRoot,
        Capability::Destination,
        Capability::Answers,
        Capability::Style,
        Capability::Console,
        Capability::RenderTemplates,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Capability::Env => "env",
            Capability::TemplateDir => "template_dir",
            Capability::TemplateRoot => "template_root",
            Capability::Destination => "destination",
            Capability::Answers => "answers",
            Capability::Style => "style",
            Capability::Console => "console",
            Capability::RenderTemplates => "render_templates",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Capability::ALL
            .into_iter()
            .find(|capability| capability.name() == s)
            .ok_or_else(|| Error::UnknownApplyParameter { parameter: s.to_string() })
    }
}

/// Set of requested capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities(BTreeSet<Capability>);

impl Capabilities {
    /// Binds declared parameter names to the pool.
    ///
    /// # Errors
    /// * `Error::UnknownApplyParameter` naming the first name outside the pool
    pub fn parse<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| name.as_ref().parse::<Capability>())
            .collect::<Result<BTreeSet<_>>>()
            .map(Capabilities)
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }
}

/// Collaborators handed to a custom strategy. Only requested members are `Some`.
pub struct Collaborators<'a> {
    pub env: Option<&'a TemplateEnv>,
    pub template_dir: Option<&'a Path>,
    pub template_root: Option<&'a Path>,
    pub destination: Option<&'a Path>,
    pub answers: Option<&'a Answers>,
    pub style: Option<&'a Style>,
    pub console: Option<&'a Console>,
    /// The default renderer's per-file logic, on demand.
    pub render_templates: Option<&'a Processor<'a>>,
    /// Existing destination files may be replaced. Always provided.
    pub force: bool,
}

impl<'a> Collaborators<'a> {
    fn bind(capabilities: &Capabilities, processor: &'a Processor<'a>) -> Self {
        let ctx = processor.context();
        let has = |capability| capabilities.contains(capability);
        Collaborators {
            env: has(Capability::Env).then_some(ctx.env),
            template_dir: has(Capability::TemplateDir).then_some(ctx.template_dir),
            template_root: has(Capability::TemplateRoot).then_some(ctx.template_root),
            destination: has(Capability::Destination).then_some(ctx.destination),
            answers: has(Capability::Answers).then_some(ctx.answers),
            style: has(Capability::Style).then_some(ctx.style),
            console: has(Capability::Console).then_some(ctx.console),
            render_templates: has(Capability::RenderTemplates).then_some(processor),
            force: ctx.force,
        }
    }
}

/// Custom generation logic replacing the default render pass.
pub trait GenerationStrategy {
    /// Declared parameter names, each of which must name a [`Capability`].
    fn parameters(&self) -> Vec<&str>;

    /// Generates the project. Returns the created paths for the summary, if known.
    fn apply(&self, collaborators: Collaborators<'_>) -> anyhow::Result<Option<Vec<PathBuf>>>;
}

/// Strategy backed by a closure.
pub struct FnStrategy<F> {
    parameters: Vec<String>,
    f: F,
}

/// Wraps a closure as a [`GenerationStrategy`] declaring `parameters`.
pub fn strategy<F>(parameters: &[&str], f: F) -> FnStrategy<F>
where
    F: Fn(Collaborators<'_>) -> anyhow::Result<Option<Vec<PathBuf>>>,
{
    FnStrategy { parameters: parameters.iter().map(|p| p.to_string()).collect(), f }
}

impl<F> GenerationStrategy for FnStrategy<F>
where
    F: Fn(Collaborators<'_>) -> anyhow::Result<Option<Vec<PathBuf>>>,
{
    fn parameters(&self) -> Vec<&str> {
        self.parameters.iter().map(String::as_str).collect()
    }

    fn apply(&self, collaborators: Collaborators<'_>) -> anyhow::Result<Option<Vec<PathBuf>>> {
        (self.f)(collaborators)
    }
}

#[derive(Serialize)]
struct CommandPayload<'a> {
    force: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    env: Option<&'a indexmap::IndexMap<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template_dir: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template_root: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    answers: Option<&'a Answers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<&'a Style>,
}

/// Strategy declared in a manifest: an external program run from the template root.
///
/// The requested serializable collaborators arrive as one JSON document on stdin.
/// With `console` the program's output goes to the terminal; without it each
/// non-empty stdout line is read as a created path. With `render_templates` the
/// default render pass runs before the program.
#[derive(Debug, Clone)]
pub struct CommandStrategy {
    uses: Vec<String>,
    command: Vec<String>,
    working_dir: PathBuf,
}

impl CommandStrategy {
    pub fn new(uses: Vec<String>, command: Vec<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self { uses, command, working_dir: working_dir.into() }
    }
}

impl GenerationStrategy for CommandStrategy {
    fn parameters(&self) -> Vec<&str> {
        self.uses.iter().map(String::as_str).collect()
    }

    fn apply(&self, collaborators: Collaborators<'_>) -> anyhow::Result<Option<Vec<PathBuf>>> {
        let (program, args) =
            self.command.split_first().context("apply command must not be empty")?;

        let mut created = Vec::new();
        if let Some(processor) = collaborators.render_templates {
            for outcome in processor.render_all()? {
                created.extend(outcome.target);
            }
        }

        let payload = CommandPayload {
            force: collaborators.force,
            env: collaborators.env.map(TemplateEnv::globals),
            template_dir: collaborators.template_dir,
            template_root: collaborators.template_root,
            destination: collaborators.destination,
            answers: collaborators.answers,
            style: collaborators.style,
        };

        let payload = serde_json::to_vec(&payload)?;

        debug!("Running apply command '{}'.", self.command.join(" "));
        let stdout = if collaborators.console.is_some() { Stdio::inherit() } else { Stdio::piped() };
        let mut child = Command::new(program)
            .args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .stdout(stdout)
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("cannot start '{program}'"))?;

        let written = match child.stdin.take() {
            Some(mut stdin) => match stdin.write_all(&payload) {
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("'{program}' closed its input before reading the payload.");
                    Ok(())
                }
                other => other,
            },
            None => Ok(()),
        };

        // Reaped before any outcome is reported; the exit status takes precedence.
        let output = child.wait_with_output()?;
        if !output.status.success() {
            anyhow::bail!("'{program}' failed with status: {}", output.status);
        }
        written.with_context(|| format!("cannot send the payload to '{program}'"))?;

        if collaborators.console.is_none() {
            created.extend(
                String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(PathBuf::from),
            );
        }
        Ok(Some(created))
    }
}

/// Created paths relative to the destination where possible.
fn normalise_created(created: Vec<PathBuf>, destination: &Path) -> Vec<PathBuf> {
    created
        .into_iter()
        .map(|path| match path.strip_prefix(destination) {
            Ok(relative) if path.is_absolute() => relative.to_path_buf(),
            _ => path,
        })
        .collect()
}

/// Runs the custom strategy if there is one, the default render pass otherwise.
///
/// Parameter binding happens before the destination is touched, so a strategy
/// declaring an unknown parameter fails without writing anything.
///
/// # Returns
/// * `Result<Option<Vec<PathBuf>>>` - Created paths relative to the destination,
///   `None` when a custom strategy did not report them
///
/// # Errors
/// * `Error::UnknownApplyParameter` for a declared name outside the pool
/// * `Error::ApplyFailed` if the custom strategy fails
/// * Any error of the default render pass
pub fn dispatch(
    strategy: Option<&dyn GenerationStrategy>,
    processor: &Processor<'_>,
) -> Result<Option<Vec<PathBuf>>> {
    let destination = processor.context().destination;
    match strategy {
        None => {
            ensure_destination(destination)?;
            let outcomes = processor.render_all()?;
            Ok(Some(
                outcomes
                    .into_iter()
                    .filter(|outcome| outcome.status != FileStatus::Skipped)
                    .filter_map(|outcome| outcome.target)
                    .collect(),
            ))
        }
        Some(strategy) => {
            let capabilities = Capabilities::parse(strategy.parameters())?;
            debug!(
                "Binding apply parameters: {}",
                capabilities.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
            );
            ensure_destination(destination)?;
            let collaborators = Collaborators::bind(&capabilities, processor);
            let created = strategy.apply(collaborators).map_err(|e| match e.downcast::<Error>() {
                Ok(error) => error,
                Err(other) => Error::ApplyFailed(other),
            })?;
            Ok(created.map(|paths| normalise_created(paths, destination)))
        }
    }
}
