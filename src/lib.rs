//! Sprout is a manifest-driven project scaffolding engine.
//! A template source carries a manifest describing the questions to ask and how to
//! generate the project; Sprout resolves the questions, collects the answers and either
//! renders the template directory or hands over to the manifest's own generation logic.

/// Generation dispatch between the default render pass and custom strategies
pub mod apply;

/// Command-line interface module for the Sprout application
pub mod cli;

pub mod constants;

/// Render context and console output handle
pub mod context;

/// Error types and handling for the Sprout application
pub mod error;

/// Renderer extensions enabled by name from the manifest
pub mod extensions;

/// One generation run from manifest to destination
pub mod generate;

/// Ignore patterns applied before the skip predicate
pub mod ignore;

/// Template source acquisition: local paths and git repositories
pub mod loader;

/// Manifest loading and symbol validation
/// Supports YAML and JSON (sprout.yaml, sprout.yml, sprout.json)
pub mod manifest;

/// Answer collection, coercion and validation
pub mod parser;

/// Default renderer walking the template directory
pub mod processor;

/// User input sources
pub mod prompt;

/// Questions and answers
pub mod question;

/// Template rendering environment
pub mod renderer;

/// Static and computed question lists
pub mod resolver;

/// Per-file skip predicates
pub mod skip;

/// Presentation settings
pub mod style;

/// Built-in answer validators
pub mod validators;
