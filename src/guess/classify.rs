//! Raw import path classification
//!
//! Turns the strings captured from `import`/`require` into the names a
//! package registry would know them by.

use crate::guess::builtins::{is_builtin_module, BUILTIN_PREFIX};
use std::collections::BTreeSet;

/// Deduplicated set of canonical package names
pub type PackageNameSet = BTreeSet<String>;

/// Map a raw import path to its canonical package name
///
/// Returns `None` for anything that is not an installable package:
/// core modules, relative or absolute paths, URLs, loader syntax and
/// malformed scoped names. Rules apply in order and the first hit wins.
pub fn canonical_name(raw: &str) -> Option<String> {
    if raw.starts_with(BUILTIN_PREFIX) {
        return None;
    }

    if raw.is_empty() {
        return None;
    }

    if raw.starts_with('/') {
        return None;
    }

    if raw.starts_with('.') {
        return None;
    }

    if raw.starts_with("http:") || raw.starts_with("https:") {
        return None;
    }

    // webpack-style loaders: "style-loader!./x.css"
    if raw.contains('!') {
        return None;
    }

    if raw.starts_with('@') {
        let parts: Vec<&str> = raw.split('/').collect();
        if parts.len() < 2 {
            return None;
        }
        return Some(parts[..2].join("/"));
    }

    let name = raw.split('/').next().unwrap_or(raw);
    if is_builtin_module(name) {
        return None;
    }

    Some(name.to_string())
}

/// Classify every raw path and collect the survivors
pub fn classify<I, S>(raw_paths: I) -> PackageNameSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw_paths
        .into_iter()
        .filter_map(|raw| canonical_name(raw.as_ref()))
        .collect()
}
