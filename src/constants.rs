//! Common constants used throughout the Sprout application.

/// Supported manifest file names, tried in order at the template source root.
pub const MANIFEST_FILES: [&str; 3] = ["sprout.yaml", "sprout.yml", "sprout.json"];

/// Template directory used when the manifest does not name one.
pub const DEFAULT_TEMPLATE_DIR: &str = "template";

/// Reserved suffix marking a file as template content.
pub const DEFAULT_TEMPLATE_SUFFIX: &str = ".jinja";

/// Patterns that are never rendered or copied.
pub const DEFAULT_IGNORE_PATTERNS: [&str; 6] =
    ["**/*.pyc", "**/*.pyo", "**/*.swp", "**/*~", "**/.DS_Store", "**/__pycache__/**"];

/// How many times a single question is asked before the run is aborted.
pub const MAX_ANSWER_ATTEMPTS: usize = 5;
