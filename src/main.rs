//! Sprout's main application entry point.
//! Handles command-line argument parsing and wires the template source, manifest,
//! prompter and console into one generation run.

use std::io::IsTerminal;

use sprout::{
    cli::{get_args, Args},
    context::Console,
    error::{default_error_handler, Result},
    generate::execute_manifest,
    loader::load_template,
    manifest::load_manifest,
    prompt::{DialoguerPrompter, LinePrompter, Prompter},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Off
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the template source (local path or git checkout)
/// 2. Loads and validates the manifest
/// 3. Picks an interactive or line-based prompter
/// 4. Executes the manifest into the destination
fn run(args: Args) -> Result<()> {
    let template = load_template(&args.template)?;
    let manifest = load_manifest(template.root())?;
    let console = Console::stdout();

    let mut prompter: Box<dyn Prompter> =
        if std::io::stdin().is_terminal() && std::io::stdout().is_terminal() {
            Box::new(DialoguerPrompter::new())
        } else {
            Box::new(LinePrompter::new(std::io::stdin().lock(), std::io::stdout()))
        };

    execute_manifest(
        &manifest,
        template.root(),
        &args.destination,
        args.force,
        prompter.as_mut(),
        &console,
    )?;
    Ok(())
}
