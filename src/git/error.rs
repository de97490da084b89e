//! Git error handling
//!
//! Translates git2 errors into package-level errors with messages a user can
//! act on.

use git2::{Error, ErrorClass, ErrorCode};

use crate::error::BranchpackError;

/// Short, user-facing description of a git2 error
pub fn interpret(err: &Error) -> String {
    let message = err.message().to_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|n| message.contains(n));

    if contains_any(&["not found", "404", "too many redirects", "authentication replays"]) {
        "Repository not found".to_string()
    } else if contains_any(&["authentication", "credentials"]) {
        "Authentication failed".to_string()
    } else if contains_any(&["permission denied", "access denied"]) {
        "Permission denied".to_string()
    } else if contains_any(&["connection", "network", "timeout", "timed out"]) {
        "Network error".to_string()
    } else {
        match err.class() {
            ErrorClass::Http => format!("HTTP error: {}", err.message()),
            ErrorClass::Ssh => format!("SSH error: {}", err.message()),
            _ => err.message().to_string(),
        }
    }
}

/// Error for a failed fetch of `branch`
pub fn fetch_failed(branch: &str, err: &Error) -> BranchpackError {
    let message = err.message().to_lowercase();
    let missing_ref = message.contains("couldn't find remote ref")
        || (err.code() == ErrorCode::NotFound && message.contains("ref"));
    if missing_ref {
        return BranchpackError::PackageNotFound {
            package: branch.to_string(),
        };
    }

    BranchpackError::ContentRetrievalFailed {
        package: branch.to_string(),
        reason: interpret(err),
    }
}

/// Error for a failed object lookup on `branch`
pub fn content_failed(branch: &str, err: &Error) -> BranchpackError {
    BranchpackError::ContentRetrievalFailed {
        package: branch.to_string(),
        reason: err.message().to_string(),
    }
}
