//! Default renderer: walks the template directory and renders or copies every
//! candidate file into the destination.

use globset::GlobSet;
use log::debug;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::context::RenderContext;
use crate::error::{Error, Result};
use crate::renderer::has_template_tokens;
use crate::skip::SkipPredicate;

/// Final state of one candidate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Ignored, rejected by the skip predicate, or rendered to an unusable path.
    Skipped,
    /// Content rendered through the template engine, reserved suffix stripped.
    Rendered,
    /// Content copied byte for byte.
    Copied,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Skipped => write!(f, "Skipped"),
            FileStatus::Rendered => write!(f, "Rendered"),
            FileStatus::Copied => write!(f, "Copied"),
        }
    }
}

/// What happened to one candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub source: PathBuf,
    /// Path relative to the template directory.
    pub relative: String,
    /// Written path relative to the destination, `None` when skipped.
    pub target: Option<PathBuf>,
    pub status: FileStatus,
}

impl FileOutcome {
    fn skipped(source: &Path, relative: String) -> Self {
        Self { source: source.to_path_buf(), relative, target: None, status: FileStatus::Skipped }
    }
}

/// Ensures the destination root exists and is a directory.
///
/// # Errors
/// * `Error::WriteError` if the destination is an existing file or cannot be created
pub fn ensure_destination(destination: &Path) -> Result<()> {
    if destination.is_file() {
        return Err(Error::write_error(
            destination,
            std::io::Error::other("destination is a file, expected a directory"),
        ));
    }
    fs::create_dir_all(destination).map_err(|e| Error::write_error(destination, e))
}

/// Relative path with `/` separators, independent of the host platform.
pub fn to_posix(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether a rendered relative path can be joined onto the destination safely.
/// Empty, absolute, empty-segment and parent-directory paths are rejected.
pub fn is_rendered_path_valid(path: &str) -> bool {
    if path.trim().is_empty() || path.starts_with('/') {
        return false;
    }
    if path.split('/').any(|segment| segment.trim().is_empty()) {
        return false;
    }
    Path::new(path).components().all(|c| matches!(c, Component::Normal(_)))
}

/// Per-file render/copy logic over one [`RenderContext`].
pub struct Processor<'a> {
    ctx: RenderContext<'a>,
    ignored: &'a GlobSet,
    skip: Option<&'a dyn SkipPredicate>,
}

impl<'a> Processor<'a> {
    pub fn new(
        ctx: RenderContext<'a>,
        ignored: &'a GlobSet,
        skip: Option<&'a dyn SkipPredicate>,
    ) -> Self {
        Self { ctx, ignored, skip }
    }

    pub fn context(&self) -> &RenderContext<'a> {
        &self.ctx
    }

    /// Decides the fate of one file under the template directory and carries it out.
    ///
    /// # Arguments
    /// * `source` - File path under the template directory
    ///
    /// # Errors
    /// * `Error::SkipPredicateError` if the predicate fails
    /// * `Error::RenderError` if the path or content fails to render
    /// * `Error::DestinationConflict` if the target exists and the run is not forced
    /// * `Error::WriteError` if the target cannot be written
    pub fn process(&self, source: &Path) -> Result<FileOutcome> {
        let ctx = &self.ctx;
        let relative_path = source.strip_prefix(ctx.template_dir).map_err(|_| {
            Error::IoError(std::io::Error::other(format!(
                "'{}' is outside the template directory",
                source.display()
            )))
        })?;
        let relative = to_posix(relative_path);

        debug!("Processing source file: {relative}");

        if self.ignored.is_match(relative_path) {
            debug!("Skipping '{relative}': matches an ignore pattern.");
            return Ok(FileOutcome::skipped(source, relative));
        }

        if let Some(skip) = self.skip {
            let skipped = skip.should_skip(&relative, ctx.answers).map_err(|e| {
                Error::SkipPredicateError { path: relative.clone(), reason: format!("{e:#}") }
            })?;
            if skipped {
                debug!("Skipping '{relative}': skip predicate returned true.");
                return Ok(FileOutcome::skipped(source, relative));
            }
        }

        let rendered_path = if has_template_tokens(&relative) {
            ctx.env.render(&relative, ctx.answers)?
        } else {
            relative.clone()
        };
        if !is_rendered_path_valid(&rendered_path) {
            debug!("Skipping '{relative}': rendered path '{rendered_path}' is not usable.");
            return Ok(FileOutcome::skipped(source, relative));
        }

        let file_name = source.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let is_template = ctx.env.is_template_file(file_name);
        let target_relative = if is_template {
            let target = PathBuf::from(&rendered_path);
            let name = target.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            target.with_file_name(ctx.env.strip_suffix(name))
        } else {
            PathBuf::from(&rendered_path)
        };

        let target = ctx.destination.join(&target_relative);
        if target.exists() && !ctx.force {
            return Err(Error::DestinationConflict { path: target.display().to_string() });
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::write_error(parent, e))?;
        }

        let status = if is_template {
            let content = fs::read_to_string(source)?;
            let rendered = ctx.env.render(&content, ctx.answers)?;
            debug!("Writing file: {}", target.display());
            fs::write(&target, rendered).map_err(|e| Error::write_error(&target, e))?;
            FileStatus::Rendered
        } else {
            debug!("Copying file: {}", target.display());
            fs::copy(source, &target).map_err(|e| Error::write_error(&target, e))?;
            FileStatus::Copied
        };
        ctx.console.print(format!("{status}: '{}'", to_posix(&target_relative)));

        Ok(FileOutcome { source: source.to_path_buf(), relative, target: Some(target_relative), status })
    }

    /// Processes every file under the template directory in lexical path order.
    ///
    /// Stops at the first error; files processed before it stay written.
    pub fn render_all(&self) -> Result<Vec<FileOutcome>> {
        let template_dir = self.ctx.template_dir;
        if !template_dir.is_dir() {
            return Err(Error::TemplateDoesNotExistsError {
                template_dir: template_dir.display().to_string(),
            });
        }

        debug!("Processing template directory '{}'.", template_dir.display());
        let mut outcomes = Vec::new();
        for entry in WalkDir::new(template_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::IoError(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            outcomes.push(self.process(entry.path())?);
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_posix() {
        assert_eq!(to_posix(Path::new("a").join("b").join("c.txt").as_path()), "a/b/c.txt");
    }

    #[test]
    fn test_is_rendered_path_valid() {
        assert!(!is_rendered_path_valid(""));
        assert!(!is_rendered_path_valid("output//filename.txt"));
        assert!(!is_rendered_path_valid("/filename.txt"));
        assert!(!is_rendered_path_valid("../escape.txt"));
        assert!(!is_rendered_path_valid("/README.md"));
        assert!(is_rendered_path_valid("filename.txt"));
        assert!(is_rendered_path_valid("output/filename.txt"));
    }
}
