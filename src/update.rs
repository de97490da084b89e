//! Updating installed packages from the repository
//!
//! The installed version comes from the package's pack.lock, or its pack.json
//! when there is no lockfile. The remote version is read from the pack.json on
//! the branch. A strictly newer remote version triggers a full reinstall.

use tracing::{debug, info};

use crate::config::Manifest;
use crate::error::{BranchpackError, Result};
use crate::installer::{Installer, validate_name};
use crate::version::Version;

/// Result of an update check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The package was reinstalled at a newer version
    Updated { from: String, to: String },

    /// The installed version is not older than the remote one
    UpToDate { version: String },
}

impl Installer {
    /// Version of installed package `name`
    pub fn installed_version(&self, name: &str) -> Result<String> {
        if let Some(lockfile) = self.read_local_lockfile(name)? {
            return Ok(lockfile.version);
        }

        self.read_local_manifest(name)?
            .version
            .ok_or_else(|| BranchpackError::MissingVersion {
                package: name.to_string(),
            })
    }

    /// Version declared by the pack.json on branch `name`
    pub fn remote_version(&self, name: &str) -> Result<String> {
        let no_manifest = || BranchpackError::NoRemoteManifest {
            package: name.to_string(),
        };

        let bytes = self.repository().get_manifest(name)?.ok_or_else(no_manifest)?;
        Manifest::from_slice(name, &bytes)?
            .version
            .ok_or_else(no_manifest)
    }

    /// Reinstall `name` if the repository has a newer version
    pub fn update(&self, name: &str) -> Result<UpdateOutcome> {
        validate_name(name)?;

        if !self.is_installed(name) {
            return Err(BranchpackError::PackageNotFound {
                package: name.to_string(),
            });
        }

        let local = self.installed_version(name)?;
        let remote = self.remote_version(name)?;
        debug!("'{}': installed {}, remote {}", name, local, remote);

        if !Version::parse(&remote)?.is_newer_than(&Version::parse(&local)?) {
            info!("'{}' is up to date ({})", name, local);
            return Ok(UpdateOutcome::UpToDate { version: local });
        }

        info!("Updating '{}' from {} to {}", name, local, remote);
        self.uninstall(name)?;
        let lockfile = self.install(name)?;

        Ok(UpdateOutcome::Updated {
            from: local,
            to: lockfile.version,
        })
    }
}
