//! Template source acquisition: local directories and git repositories.
use crate::error::Result;
use crate::loader::git::GitLoader;
use crate::loader::interface::TemplateLoader;
use crate::loader::local::LocalLoader;
use log::info;
use std::path::PathBuf;

pub mod git;
pub mod interface;
pub mod local;

pub use interface::LoadedTemplate;

/// Represents the source location of a template.
#[derive(Debug, PartialEq, Eq)]
pub enum TemplateSource {
    /// Local filesystem template path
    FileSystem(PathBuf),
    /// Git repository URL (HTTPS or SSH) or `owner/repo` shorthand
    Git(String),
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateSource::FileSystem(path) => {
                write!(f, "local path: '{}'", path.display())
            }
            TemplateSource::Git(repo) => write!(f, "git repository: '{repo}'"),
        }
    }
}

impl TemplateSource {
    /// Classifies a template argument. Existing local paths win over the `owner/repo` shorthand.
    pub fn from_string(s: &str) -> Self {
        if GitLoader::<&str>::is_git_url(s) {
            return Self::Git(s.to_string());
        }
        let path = PathBuf::from(s);
        if !path.exists() && git::is_shorthand(s) {
            return Self::Git(s.to_string());
        }
        Self::FileSystem(path)
    }

    pub fn load(self) -> Result<LoadedTemplate> {
        info!("Using template from the {self}");
        match self {
            TemplateSource::Git(repo) => GitLoader::new(repo).load(),
            TemplateSource::FileSystem(path) => LocalLoader::new(path).load(),
        }
    }
}

/// Returns the loaded template for a template argument.
pub fn load_template(template: &str) -> Result<LoadedTemplate> {
    TemplateSource::from_string(template).load()
}
