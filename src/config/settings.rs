//! Tool settings (branchpack.yaml)
//!
//! Settings come from three layers, later ones winning:
//! built-in defaults, an optional `branchpack.yaml` in the working directory,
//! and command-line flags (which clap also fills from `BRANCHPACK_*`
//! environment variables).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BranchpackError, Result};

/// Settings file name looked up in the working directory
pub const SETTINGS_FILE: &str = "branchpack.yaml";

/// Repository every package branch is fetched from unless configured otherwise
pub const DEFAULT_REPOSITORY: &str = "https://github.com/Bractothorpe/pkg.git";

/// Directory (relative to the working directory) holding installed packages
pub const DEFAULT_PACKAGES_DIR: &str = "packages";

/// Default cache directory name under user's cache directory
const CACHE_DIR: &str = "branchpack";

/// Upper bound for the default number of fetch workers
const MAX_DEFAULT_JOBS: usize = 8;

/// Contents of branchpack.yaml
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub repository: Option<String>,
    pub packages_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
}

impl SettingsFile {
    /// Parse settings from YAML string
    pub fn from_yaml(path: &Path, yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| BranchpackError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Load settings from `path`, or defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let yaml = fs::read_to_string(path).map_err(|e| BranchpackError::ConfigReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml(path, &yaml)
    }

    /// Overlay `other` on top of these settings
    #[must_use]
    pub fn merged_with(self, other: SettingsFile) -> Self {
        Self {
            repository: other.repository.or(self.repository),
            packages_dir: other.packages_dir.or(self.packages_dir),
            cache_dir: other.cache_dir.or(self.cache_dir),
            jobs: other.jobs.or(self.jobs),
        }
    }
}

/// Effective settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Git URL (or local path) of the package repository
    pub repository: String,

    /// Directory holding one subdirectory per installed package
    pub packages_dir: PathBuf,

    /// Directory for the bare repository mirror
    pub cache_dir: PathBuf,

    /// Number of concurrent file fetches per package
    pub jobs: usize,
}

impl Settings {
    /// Resolve settings for `cwd`, applying command-line `overrides` last
    pub fn load(cwd: &Path, config_path: Option<&Path>, overrides: SettingsFile) -> Result<Self> {
        let config_path = config_path.map_or_else(|| cwd.join(SETTINGS_FILE), Path::to_path_buf);
        let file = SettingsFile::load(&config_path)?;
        Self::resolve(cwd, file.merged_with(overrides))
    }

    /// Fill unset values with defaults and anchor relative paths at `cwd`
    pub fn resolve(cwd: &Path, file: SettingsFile) -> Result<Self> {
        let packages_dir = file
            .packages_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PACKAGES_DIR));
        let cache_dir = match file.cache_dir {
            Some(dir) => dir,
            None => default_cache_dir()?,
        };

        Ok(Self {
            repository: file
                .repository
                .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string()),
            packages_dir: anchor(cwd, packages_dir),
            cache_dir: anchor(cwd, cache_dir),
            jobs: file.jobs.filter(|jobs| *jobs > 0).unwrap_or_else(default_jobs),
        })
    }
}

fn anchor(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

/// Get the default cache directory path
///
/// Uses the platform's standard cache location (e.g. XDG on Linux, Library/Caches on macOS)
/// with a `branchpack` subdirectory.
fn default_cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().ok_or_else(|| BranchpackError::IoError {
        message: "Could not determine cache directory".to_string(),
    })?;

    Ok(base.join(CACHE_DIR))
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map_or(1, std::num::NonZeroUsize::get)
        .min(MAX_DEFAULT_JOBS)
}
