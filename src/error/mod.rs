//! Error types and handling for branchpack
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Errors raised below the top-level package are wrapped in
//! [`BranchpackError::DependencyResolutionFailed`] on their way up, so the
//! message shows the whole dependency chain. [`BranchpackError::root_cause`]
//! unwraps that chain again.

use miette::Diagnostic;
use thiserror::Error;


/// Main error type for branchpack operations
#[derive(Error, Diagnostic, Debug)]
pub enum BranchpackError {
    // Manifest errors
    #[error("Package '{package}' has no pack.json")]
    #[diagnostic(
        code(branchpack::manifest::missing),
        help("Every package branch must contain a pack.json at its root")
    )]
    MissingManifest { package: String },

    #[error("Invalid pack.json for package '{package}': {reason}")]
    #[diagnostic(code(branchpack::manifest::invalid))]
    InvalidManifest { package: String, reason: String },

    #[error("Package '{package}' does not declare a version")]
    #[diagnostic(
        code(branchpack::manifest::missing_version),
        help("Add a \"version\" field to the package's pack.json")
    )]
    MissingVersion { package: String },

    // Version errors
    #[error("Package '{package}' version {found} does not satisfy required version {required}")]
    #[diagnostic(code(branchpack::version::mismatch))]
    VersionMismatch {
        package: String,
        required: String,
        found: String,
    },

    #[error("Invalid version '{version}': {reason}")]
    #[diagnostic(
        code(branchpack::version::invalid),
        help("Versions follow semantic versioning, e.g. 1.2.0 or >=1.0.0, <2.0.0")
    )]
    InvalidVersion { version: String, reason: String },

    // Resolution errors
    #[error("Failed to resolve dependency '{dependency}' of package '{package}': {source}")]
    #[diagnostic(code(branchpack::deps::resolution_failed))]
    DependencyResolutionFailed {
        package: String,
        dependency: String,
        #[source]
        source: Box<BranchpackError>,
    },

    #[error("Failed to retrieve contents of package '{package}': {reason}")]
    #[diagnostic(
        code(branchpack::content::retrieval_failed),
        help("Check that the repository URL is correct and reachable")
    )]
    ContentRetrievalFailed { package: String, reason: String },

    #[error("Script {key} of package '{package}' failed with exit status {status}: {command}")]
    #[diagnostic(code(branchpack::scripts::failed))]
    ScriptExecutionFailed {
        package: String,
        key: u64,
        command: String,
        status: i32,
    },

    #[error("Remote branch '{package}' has no pack.json with a version")]
    #[diagnostic(code(branchpack::update::no_remote_manifest))]
    NoRemoteManifest { package: String },

    #[error("Package '{package}' not found")]
    #[diagnostic(
        code(branchpack::package::not_found),
        help("Run 'branchpack list' to see installed packages")
    )]
    PackageNotFound { package: String },

    #[error("Invalid package name: '{name}'")]
    #[diagnostic(
        code(branchpack::package::invalid_name),
        help("Package names are branch names without path separators")
    )]
    InvalidPackageName { name: String },

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(branchpack::git::operation_failed))]
    GitOperationFailed { message: String },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(branchpack::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(code(branchpack::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(branchpack::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(branchpack::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(branchpack::fs::io_error))]
    IoError { message: String },
}

impl BranchpackError {
    /// Wrap an error raised while resolving `dependency` on behalf of `package`
    pub fn dependency_failed(
        package: impl Into<String>,
        dependency: impl Into<String>,
        source: BranchpackError,
    ) -> Self {
        BranchpackError::DependencyResolutionFailed {
            package: package.into(),
            dependency: dependency.into(),
            source: Box::new(source),
        }
    }

    /// The innermost error of a dependency chain
    pub fn root_cause(&self) -> &BranchpackError {
        let mut current = self;
        while let BranchpackError::DependencyResolutionFailed { source, .. } = current {
            current = source;
        }
        current
    }
}

impl From<std::io::Error> for BranchpackError {
    fn from(err: std::io::Error) -> Self {
        BranchpackError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BranchpackError {
    fn from(err: serde_json::Error) -> Self {
        BranchpackError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for BranchpackError {
    fn from(err: git2::Error) -> Self {
        BranchpackError::GitOperationFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, BranchpackError>;
