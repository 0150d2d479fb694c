use crate::error::{Error, Result};
use crate::loader::interface::{LoadedTemplate, TemplateLoader};
use log::debug;
use url::Url;

/// Loader for templates from git repositories.
pub struct GitLoader<S: AsRef<str>> {
    repo: S,
}

impl<S: AsRef<str>> GitLoader<S> {
    /// Creates a new GitLoader instance.
    pub fn new(repo: S) -> Self {
        Self { repo }
    }

    /// Whether a template argument names a remote repository rather than a path.
    pub fn is_git_url(repo: &str) -> bool {
        if let Ok(url) = Url::parse(repo) {
            return matches!(url.scheme(), "https" | "http" | "ssh" | "git");
        }
        repo.starts_with("git@")
    }

    /// Expands `owner/repo` to a GitHub HTTPS URL; other values pass through trimmed.
    pub fn normalize(repo: &str) -> String {
        let cleaned = repo.trim();
        if Self::is_git_url(cleaned) {
            return cleaned.to_string();
        }
        if is_shorthand(cleaned) {
            let (owner, name) = cleaned.split_once('/').unwrap_or((cleaned, ""));
            let name = name.strip_suffix(".git").unwrap_or(name);
            return format!("https://github.com/{owner}/{name}.git");
        }
        cleaned.to_string()
    }
}

/// `owner/repo`: exactly one slash, no whitespace, not a relative or absolute path.
pub fn is_shorthand(repo: &str) -> bool {
    repo.matches('/').count() == 1
        && !repo.contains(char::is_whitespace)
        && !repo.starts_with(['.', '/', '~'])
        && !repo.ends_with('/')
}

impl<S: AsRef<str>> TemplateLoader for GitLoader<S> {
    /// Loads a template by cloning a git repository into a temporary directory.
    ///
    /// # Errors
    /// * `Error::Git2Error` if the clone fails
    fn load(&self) -> Result<LoadedTemplate> {
        let repo_url = Self::normalize(self.repo.as_ref());
        let checkout = tempfile::Builder::new().prefix("sprout-template-").tempdir()?;
        let clone_path = checkout.path().join("template");

        debug!("Cloning repository '{}' to '{}'.", repo_url, clone_path.display());

        // Set up authentication callbacks
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
            } else {
                git2::Cred::default()
            }
        });

        let mut fetch_opts = git2::FetchOptions::new();
        fetch_opts.remote_callbacks(callbacks);
        fetch_opts.depth(1);

        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(fetch_opts);

        match builder.clone(&repo_url, &clone_path) {
            Ok(_) => Ok(LoadedTemplate::checkout(clone_path, checkout)),
            Err(e) => Err(Error::Git2Error { source_path: repo_url, e }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_git_url() {
        assert!(GitLoader::<&str>::is_git_url("https://github.com/user/repo.git"));
        assert!(GitLoader::<&str>::is_git_url("git@github.com:user/repo.git"));
        assert!(GitLoader::<&str>::is_git_url("ssh://git@example.com/repo.git"));
        assert!(!GitLoader::<&str>::is_git_url("./local/path"));
        assert!(!GitLoader::<&str>::is_git_url("user/repo"));
    }

    #[test]
    fn test_normalize_shorthand() {
        assert_eq!(GitLoader::<&str>::normalize("user/repo"), "https://github.com/user/repo.git");
        assert_eq!(
            GitLoader::<&str>::normalize("user/repo.git"),
            "https://github.com/user/repo.git"
        );
        assert_eq!(
            GitLoader::<&str>::normalize(" git@github.com:user/repo.git "),
            "git@github.com:user/repo.git"
        );
    }

    #[test]
    fn test_is_shorthand() {
        assert!(is_shorthand("user/repo"));
        assert!(!is_shorthand("./user/repo"));
        assert!(!is_shorthand("a/b/c"));
        assert!(!is_shorthand("/abs"));
    }
}
