//! Package installation for branchpack
//!
//! This module handles:
//! - Installing a package and every missing dependency as one transaction
//! - Retrieving branch contents onto disk (see [`fetch`])
//! - Running post-install scripts (see [`scripts`])
//! - Uninstalling, inspecting and listing installed packages
//!
//! Dependency resolution itself lives in [`crate::resolver`].

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{LOCKFILE_FILE, Lockfile, MANIFEST_FILE, Manifest};
use crate::error::{BranchpackError, Result};
use crate::fs::Filesystem;
use crate::repository::RepositoryClient;
use crate::resolver::ResolutionState;
use crate::script::CommandRunner;
use crate::transaction::Transaction;

mod fetch;
mod scripts;


/// An entry of the packages directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    /// Package (directory) name
    pub name: String,

    /// Version declared by its pack.json, if readable
    pub version: Option<String>,
}

/// Installs packages from a repository into a packages directory
pub struct Installer {
    repository: Arc<dyn RepositoryClient>,
    fs: Arc<dyn Filesystem>,
    runner: Arc<dyn CommandRunner>,

    /// Directory holding one subdirectory per installed package
    packages_dir: PathBuf,

    /// Workers for concurrent file retrieval
    pool: rayon::ThreadPool,
}

impl Installer {
    /// Create an installer fetching up to `jobs` files at once
    pub fn new(
        repository: Arc<dyn RepositoryClient>,
        fs: Arc<dyn Filesystem>,
        runner: Arc<dyn CommandRunner>,
        packages_dir: impl Into<PathBuf>,
        jobs: usize,
    ) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs.max(1))
            .thread_name(|index| format!("branchpack-fetch-{index}"))
            .build()
            .map_err(|e| BranchpackError::IoError {
                message: format!("Failed to start fetch workers: {e}"),
            })?;

        Ok(Self {
            repository,
            fs,
            runner,
            packages_dir: packages_dir.into(),
            pool,
        })
    }

    pub(crate) fn repository(&self) -> &dyn RepositoryClient {
        self.repository.as_ref()
    }

    pub fn packages_dir(&self) -> &Path {
        &self.packages_dir
    }

    /// Directory of package `name`
    pub fn package_dir(&self, name: &str) -> PathBuf {
        self.packages_dir.join(name)
    }

    /// Whether package `name` has a directory in the packages directory
    pub fn is_installed(&self, name: &str) -> bool {
        self.fs.exists(&self.package_dir(name))
    }

    /// Install `name` with all of its dependencies
    ///
    /// An installed copy of `name` is removed first. Dependencies that are
    /// already installed are used as they are. If anything fails, every
    /// package directory created by this call is removed again.
    pub fn install(&self, name: &str) -> Result<Lockfile> {
        validate_name(name)?;

        if self.is_installed(name) {
            info!("Reinstalling '{}'", name);
            self.uninstall(name)?;
        }

        let mut transaction = Transaction::new(Arc::clone(&self.fs));
        let mut state = ResolutionState::new();

        match self.resolve(name, None, &mut state, &mut transaction) {
            Ok(lockfile) => {
                transaction.commit();
                Ok(lockfile)
            }
            Err(e) => {
                warn!("Installing '{}' failed, rolling back", name);
                if let Err(rollback_err) = transaction.rollback() {
                    warn!("Rollback incomplete: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    /// Remove package `name`
    pub fn uninstall(&self, name: &str) -> Result<()> {
        validate_name(name)?;

        let dir = self.package_dir(name);
        if !self.fs.exists(&dir) {
            return Err(BranchpackError::PackageNotFound {
                package: name.to_string(),
            });
        }

        debug!("Removing {}", dir.display());
        self.fs.delete_recursive(&dir)?;
        info!("Uninstalled '{}'", name);
        Ok(())
    }

    /// Manifest of installed package `name`
    pub fn info(&self, name: &str) -> Result<Manifest> {
        validate_name(name)?;

        if !self.is_installed(name) {
            return Err(BranchpackError::PackageNotFound {
                package: name.to_string(),
            });
        }

        self.read_local_manifest(name)
    }

    /// All installed packages, sorted by name
    ///
    /// A package whose manifest cannot be read is listed without a version.
    pub fn list(&self) -> Result<Vec<InstalledPackage>> {
        let names = self.fs.list_dirs(&self.packages_dir)?;

        Ok(names
            .into_iter()
            .map(|name| {
                let version = match self.read_local_manifest(&name) {
                    Ok(manifest) => manifest.version,
                    Err(e) => {
                        info!("{}", e);
                        None
                    }
                };
                InstalledPackage { name, version }
            })
            .collect())
    }

    /// Read the pack.json of installed package `name`
    pub(crate) fn read_local_manifest(&self, name: &str) -> Result<Manifest> {
        let bytes = self
            .fs
            .read_file(&self.package_dir(name).join(MANIFEST_FILE))?
            .ok_or_else(|| BranchpackError::MissingManifest {
                package: name.to_string(),
            })?;
        Manifest::from_slice(name, &bytes)
    }

    /// Read the pack.lock of installed package `name`, if present
    pub(crate) fn read_local_lockfile(&self, name: &str) -> Result<Option<Lockfile>> {
        self.fs
            .read_file(&self.package_dir(name).join(LOCKFILE_FILE))?
            .map(|bytes| Lockfile::from_json(&bytes))
            .transpose()
    }

    /// Persist the resolved tree of `name` as its pack.lock
    pub(crate) fn write_lockfile(&self, name: &str, lockfile: &Lockfile) -> Result<()> {
        let json = lockfile.to_json()?;
        self.fs
            .write_file(&self.package_dir(name).join(LOCKFILE_FILE), json.as_bytes())
    }
}

/// Check that `name` is usable as a single directory name
pub fn validate_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(()),
        _ => Err(BranchpackError::InvalidPackageName {
            name: name.to_string(),
        }),
    }
}
