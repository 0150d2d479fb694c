//! One generation run: title, questions, answers, then dispatch.

use std::path::{Path, PathBuf};

use log::debug;

use crate::apply::dispatch;
use crate::context::{Console, RenderContext};
use crate::error::Result;
use crate::ignore::build_ignore_set;
use crate::manifest::{Manifest, Title};
use crate::parser::collect_answers;
use crate::processor::Processor;
use crate::prompt::Prompter;
use crate::question::Answers;
use crate::renderer::TemplateEnv;
use crate::resolver::resolve_questions;

/// Result of a completed run.
#[derive(Debug)]
pub struct Generation {
    pub answers: Answers,
    /// Created paths relative to the destination, `None` when a custom strategy did not report them.
    pub created: Option<Vec<PathBuf>>,
}

fn display_title(
    title: Option<&Title>,
    env: &TemplateEnv,
    template_dir: &Path,
    destination: &Path,
    console: &Console,
) -> Result<()> {
    let text = match title {
        None => return Ok(()),
        Some(Title::Text(text)) => text.clone(),
        Some(Title::Template(template)) => env.render(
            template,
            serde_json::json!({
                "destination": destination.display().to_string(),
                "template_dir": template_dir.display().to_string(),
            }),
        )?,
        Some(Title::Computed(f)) => f(),
    };
    console.print(text);
    Ok(())
}

fn summarize(created: &[PathBuf], manifest: &Manifest, console: &Console) {
    if created.is_empty() {
        console.print("No files were generated.");
        return;
    }
    console.print("Generated files");
    for path in created {
        console.print(format!("{}{}", manifest.style.summary.prefix, path.display()));
    }
}

/// Runs a manifest against a template source root and a destination.
///
/// # Arguments
/// * `manifest` - The validated manifest
/// * `template_root` - Root of the template source
/// * `destination` - Directory the project is generated into
/// * `force` - Whether existing destination files may be replaced
/// * `prompter` - Source of answers
/// * `console` - Output handle for user-facing lines
///
/// # Flow
/// 1. Builds the rendering environment with the manifest's extensions
/// 2. Displays the title
/// 3. Resolves the questions (once, before any answer exists)
/// 4. Collects the answers
/// 5. Dispatches to the custom strategy or the default render pass
pub fn execute_manifest(
    manifest: &Manifest,
    template_root: &Path,
    destination: &Path,
    force: bool,
    prompter: &mut dyn Prompter,
    console: &Console,
) -> Result<Generation> {
    let env = TemplateEnv::with_extensions(&manifest.template_suffix, &manifest.extensions);
    let template_dir = manifest.template_dir_in(template_root);

    display_title(manifest.title.as_ref(), &env, &template_dir, destination, console)?;

    let questions = resolve_questions(&manifest.questions, &env, destination)?;
    debug!("Resolved {} question(s).", questions.len());
    let answers = collect_answers(&questions, &env, prompter, &manifest.style)?;

    let ignored = build_ignore_set(&manifest.ignore)?;
    let ctx = RenderContext {
        env: &env,
        template_dir: &template_dir,
        template_root,
        destination,
        answers: &answers,
        style: &manifest.style,
        console,
        force,
    };
    let processor = Processor::new(ctx, &ignored, manifest.should_skip_file.as_deref());
    let created = dispatch(manifest.apply.as_deref(), &processor)?;

    if let Some(created) = &created {
        summarize(created, manifest, console);
    }
    console.print(format!(
        "Template generation completed successfully in {}.",
        destination.display()
    ));

    Ok(Generation { answers, created })
}
