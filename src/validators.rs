//! Built-in answer validators.

use regex::Regex;
use url::Url;

const SSH_URL_PATTERN: &str = r"^git@[\w.-]+:[\w./-]+$";

/// Accepts an empty value, an scp-like `git@host:path`, or an HTTP(S)/SSH URL with a host and path.
pub fn validate_repository_url(value: &str) -> Result<(), String> {
    let url = value.trim();
    if url.is_empty() {
        return Ok(());
    }

    if Regex::new(SSH_URL_PATTERN).map(|re| re.is_match(url)).unwrap_or(false) {
        return Ok(());
    }

    if let Ok(parsed) = Url::parse(url) {
        let scheme_ok = matches!(parsed.scheme(), "http" | "https" | "ssh");
        let host_ok = parsed.host_str().is_some_and(|host| !host.is_empty());
        let path_ok = !parsed.path().trim_matches('/').is_empty();
        if scheme_ok && host_ok && path_ok {
            return Ok(());
        }
    }

    Err("Repository URL must be an HTTP(S) or git@ SSH URL.".to_string())
}
