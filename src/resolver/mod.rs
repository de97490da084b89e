//! Dependency resolution for branchpack packages
//!
//! This module handles:
//! - Resolving a package and its dependencies recursively, depth-first
//! - Checking each dependency's version against the requesting constraint
//! - Guarding against cycles with a per-call set of visited packages
//! - Assembling the lockfile tree bottom-up
//!
//! A dependency that is already installed is used as it is. A missing one is
//! retrieved, resolved, given its own pack.lock and has its scripts run, all
//! inside the caller's transaction.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::config::Lockfile;
use crate::error::{BranchpackError, Result};
use crate::installer::{Installer, validate_name};
use crate::transaction::Transaction;
use crate::version::{Version, satisfies};

/// Packages resolved so far in one top-level install
///
/// A package is recorded as soon as its version is known, before its own
/// dependencies are resolved, so a cycle back to it stops there. Once its
/// subtree is complete the finished node is kept as well, so a package
/// shared by several parents appears with the same tree under each.
#[derive(Debug, Default)]
pub struct ResolutionState {
    resolved: HashMap<String, Version>,
    completed: HashMap<String, Lockfile>,
}

impl ResolutionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Version `name` was resolved to, if it was visited
    pub fn version_of(&self, name: &str) -> Option<&Version> {
        self.resolved.get(name)
    }

    /// Finished lockfile node of `name`, if its subtree is complete
    pub fn node_of(&self, name: &str) -> Option<&Lockfile> {
        self.completed.get(name)
    }

    fn record(&mut self, name: &str, version: Version) {
        self.resolved.insert(name.to_string(), version);
    }

    fn complete(&mut self, name: &str, node: &Lockfile) {
        self.completed.insert(name.to_string(), node.clone());
    }
}

/// Fail with `VersionMismatch` unless `constraint` accepts `version`
fn check_constraint(name: &str, version: &Version, constraint: Option<&str>) -> Result<()> {
    let found = version.to_string();
    if satisfies(&found, constraint)? {
        return Ok(());
    }

    Err(BranchpackError::VersionMismatch {
        package: name.to_string(),
        required: constraint.unwrap_or_default().to_string(),
        found,
    })
}

impl Installer {
    /// Resolve `name` and its dependencies into a lockfile node
    ///
    /// A package visited earlier in the same call is not resolved again,
    /// provided its version satisfies `constraint`. A finished package reuses
    /// its node; one still being resolved (a cycle) becomes a leaf.
    pub(crate) fn resolve(
        &self,
        name: &str,
        constraint: Option<&str>,
        state: &mut ResolutionState,
        transaction: &mut Transaction,
    ) -> Result<Lockfile> {
        validate_name(name)?;

        if let Some(version) = state.version_of(name) {
            debug!("'{}' already resolved to {}", name, version);
            check_constraint(name, version, constraint)?;
            return Ok(state
                .node_of(name)
                .cloned()
                .unwrap_or_else(|| Lockfile::new(version.to_string())));
        }

        let fetched = !self.is_installed(name);
        if fetched {
            debug!("Retrieving '{}'", name);
            self.retrieve(name, transaction)?;
        } else {
            debug!("Using installed '{}'", name);
        }

        let manifest = self.read_local_manifest(name)?;
        let version = manifest.parsed_version(name)?;
        check_constraint(name, &version, constraint)?;

        let mut lockfile = Lockfile::new(version.to_string());
        state.record(name, version);
        for dependency in &manifest.dependencies {
            debug!(
                "Resolving '{}' {} for '{}'",
                dependency.name,
                dependency.constraint.as_deref().unwrap_or("*"),
                name
            );

            let node = self
                .resolve(
                    &dependency.name,
                    dependency.constraint.as_deref(),
                    state,
                    transaction,
                )
                .map_err(|e| BranchpackError::dependency_failed(name, &dependency.name, e))?;
            lockfile.add_dependency(dependency.name.clone(), node);
        }

        if fetched {
            self.write_lockfile(name, &lockfile)?;
            self.run_scripts(name)?.into_result(name)?;
            info!("Installed {} {}", name, lockfile.version);
        }

        state.complete(name, &lockfile);
        Ok(lockfile)
    }
}
