use crate::error::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A template source made available on the local filesystem.
///
/// Remote sources keep their checkout alive for as long as this value exists.
#[derive(Debug)]
pub struct LoadedTemplate {
    root: PathBuf,
    _checkout: Option<TempDir>,
}

impl LoadedTemplate {
    pub fn local(root: PathBuf) -> Self {
        Self { root, _checkout: None }
    }

    pub fn checkout(root: PathBuf, checkout: TempDir) -> Self {
        Self { root, _checkout: Some(checkout) }
    }

    /// Template source root, where the manifest lives.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Trait for loading templates from different sources.
pub trait TemplateLoader {
    /// Loads a template and returns its local root.
    fn load(&self) -> Result<LoadedTemplate>;
}
