//! Renderer extensions a manifest can enable by name.

use std::process::Command;
use std::str::FromStr;

use chrono::Datelike;
use cruet::Inflector;
use log::debug;
use regex::Regex;

use crate::renderer::TemplateEnv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    /// Globals `git_user_name`, `git_user_email` and `github_username`.
    GitDefaults,
    /// Global `current_year`.
    CurrentYear,
    /// Case conversion and inflection filters.
    CaseFilters,
}

impl Extension {
    /// Installed when a manifest does not list any extension.
    pub const DEFAULTS: &'static [Extension] = &[Extension::GitDefaults];

    pub fn name(&self) -> &'static str {
        match self {
            Extension::GitDefaults => "git_defaults",
            Extension::CurrentYear => "current_year",
            Extension::CaseFilters => "case_filters",
        }
    }

    pub fn install(&self, env: &mut TemplateEnv) {
        debug!("Installing extension '{}'.", self.name());
        match self {
            Extension::GitDefaults => {
                env.add_global("git_user_name", git_config("user.name").into());
                env.add_global("git_user_email", git_config("user.email").into());
                env.add_global("github_username", github_username().into());
            }
            Extension::CurrentYear => {
                env.add_global("current_year", chrono::Local::now().year().into());
            }
            Extension::CaseFilters => {
                let env = env.env_mut();
                env.add_filter("snake_case", |value: String| value.to_snake_case());
                env.add_filter("camel_case", |value: String| value.to_camel_case());
                env.add_filter("pascal_case", |value: String| value.to_pascal_case());
                env.add_filter("kebab_case", |value: String| value.to_kebab_case());
                env.add_filter("screaming_snake_case", |value: String| {
                    value.to_screaming_snake_case()
                });
                env.add_filter("title_case", |value: String| value.to_title_case());
                env.add_filter("plural", |value: String| value.to_plural());
                env.add_filter("singular", |value: String| value.to_singular());
            }
        }
    }
}

impl FromStr for Extension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "git_defaults" => Ok(Extension::GitDefaults),
            "current_year" => Ok(Extension::CurrentYear),
            "case_filters" => Ok(Extension::CaseFilters),
            other => Err(format!("unknown extension '{other}'")),
        }
    }
}

fn git_output(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn git_config(key: &str) -> String {
    git_output(&["config", "--get", key]).unwrap_or_default()
}

fn github_username() -> String {
    git_output(&["remote", "-v"]).map(|remotes| parse_github_username(&remotes)).unwrap_or_default()
}

/// First GitHub owner found in `git remote -v` output.
fn parse_github_username(remotes: &str) -> String {
    let Ok(re) = Regex::new(r"github\.com[:/]([^/\s]+)") else {
        return String::new();
    };
    remotes
        .lines()
        .find_map(|line| re.captures(line).map(|c| c[1].to_string()))
        .unwrap_or_default()
}
