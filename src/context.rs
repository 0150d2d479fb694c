//! The read-only bundle threaded through a generation run, and the console it prints to.

use std::cell::RefCell;
use std::fmt::Display;
use std::io::Write;
use std::path::Path;

use crate::question::Answers;
use crate::renderer::TemplateEnv;
use crate::style::Style;

enum Target {
    Stdout,
    Memory(Vec<u8>),
    Sink,
}

/// Output handle for user-facing lines. Passed explicitly, never global.
pub struct Console {
    target: RefCell<Target>,
}

impl Console {
    pub fn stdout() -> Self {
        Self { target: RefCell::new(Target::Stdout) }
    }

    /// Keeps everything printed so it can be read back with [`Console::captured`].
    pub fn memory() -> Self {
        Self { target: RefCell::new(Target::Memory(Vec::new())) }
    }

    pub fn sink() -> Self {
        Self { target: RefCell::new(Target::Sink) }
    }

    pub fn print(&self, line: impl Display) {
        match &mut *self.target.borrow_mut() {
            Target::Stdout => {
                let _ = writeln!(std::io::stdout(), "{line}");
            }
            Target::Memory(buf) => {
                let _ = writeln!(buf, "{line}");
            }
            Target::Sink => {}
        }
    }

    pub fn captured(&self) -> String {
        match &*self.target.borrow() {
            Target::Memory(buf) => String::from_utf8_lossy(buf).into_owned(),
            _ => String::new(),
        }
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

/// Constructed once the answers are collected; read-only for the rest of the run.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub env: &'a TemplateEnv,
    /// Absolute template directory, `template_root` joined with the manifest's `template_dir`.
    pub template_dir: &'a Path,
    pub template_root: &'a Path,
    pub destination: &'a Path,
    pub answers: &'a Answers,
    pub style: &'a Style,
    pub console: &'a Console,
    /// Existing destination files may be replaced.
    pub force: bool,
}
