//! URL handling for the repository mirror
//!
//! This module handles:
//! - Normalizing SCP-style SSH URLs and file:// URLs for libgit2
//! - Telling local repositories from remote ones
//! - Deriving a path-safe mirror directory name from a URL

use std::borrow::Cow;
use std::path::Path;

/// Normalize a repository URL so libgit2 can fetch from it
///
/// `git@host:path` becomes `ssh://git@host/path`, and relative or
/// backslashed `file://` URLs become absolute `file:///` URLs.
pub fn normalize_fetch_url(url: &str) -> Cow<'_, str> {
    if let Some(rest) = url.strip_prefix("git@") {
        if let Some((host, path)) = rest.split_once(':') {
            let path = path.strip_prefix('/').unwrap_or(path);
            return Cow::Owned(format!("ssh://git@{host}/{path}"));
        }
        return Cow::Borrowed(url);
    }

    if let Some(after) = url.strip_prefix("file://") {
        let after = after.replace('\\', "/");
        if !after.starts_with('/') {
            return Cow::Owned(format!("file:///{after}"));
        }
        if after != url["file://".len()..] {
            return Cow::Owned(format!("file://{after}"));
        }
    }

    Cow::Borrowed(url)
}

/// Whether `url` points at a repository on the local filesystem
pub fn is_local(url: &str) -> bool {
    url.starts_with("file://") || Path::new(url).is_absolute() || url.starts_with('.')
}

/// Directory name for the mirror of `url`
///
/// Every character outside `[A-Za-z0-9._]` becomes a hyphen, runs of
/// hyphens collapse, and a trailing `.git` is dropped.
pub fn mirror_key(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let mut key = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '_' {
            key.push(c);
        } else if !key.ends_with('-') {
            key.push('-');
        }
    }

    let key = key.trim_matches('-');
    if key.is_empty() || key.chars().all(|c| c == '.') {
        "repository".to_string()
    } else {
        key.to_string()
    }
}
