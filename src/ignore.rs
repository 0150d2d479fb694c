//! File ignore pattern handling for Sprout templates.
//! Ignored files never reach the skip predicate and are neither rendered nor copied.

use crate::constants::DEFAULT_IGNORE_PATTERNS;
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;

/// Builds the set of ignore globs from the manifest patterns plus the defaults.
///
/// # Arguments
/// * `patterns` - Glob patterns from the manifest's `ignore` symbol
///
/// # Returns
/// * `Result<GlobSet>` - Compiled patterns for matching paths relative to the template directory
///
/// # Notes
/// - Default patterns always apply, see [`DEFAULT_IGNORE_PATTERNS`]
/// - Blank patterns are dropped
/// - Invalid patterns result in an `IgnoreError`
pub fn build_ignore_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let mut all: Vec<&str> = DEFAULT_IGNORE_PATTERNS.to_vec();
    all.extend(patterns.iter().map(AsRef::as_ref).filter(|p| !p.trim().is_empty()));
    for pattern in all {
        debug!("Ignoring paths matching '{pattern}'.");
        builder.add(
            Glob::new(pattern)
                .map_err(|e| Error::IgnoreError(format!("invalid pattern '{pattern}': {e}")))?,
        );
    }
    builder.build().map_err(|e| Error::IgnoreError(e.to_string()))
}
