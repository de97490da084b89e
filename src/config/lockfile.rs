//! Lockfile (pack.lock) data structures
//!
//! The lockfile records the resolved dependency tree of one installed
//! package. Every node has the same shape: the resolved version and the
//! lockfile nodes of its dependencies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{BranchpackError, Result};

/// Lockfile file name at the root of every installed package
pub const LOCKFILE_FILE: &str = "pack.lock";

/// A resolved node of the dependency tree (pack.lock)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lockfile {
    /// Resolved version of this node
    pub version: String,

    /// Resolved dependencies by name
    #[serde(default)]
    pub dependencies: BTreeMap<String, Lockfile>,
}

impl Lockfile {
    /// Create a node with no dependencies
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            dependencies: BTreeMap::new(),
        }
    }

    /// Add a resolved dependency node
    pub fn add_dependency(&mut self, name: impl Into<String>, node: Lockfile) {
        self.dependencies.insert(name.into(), node);
    }

    /// Parse lockfile from JSON bytes
    pub fn from_json(json: &[u8]) -> Result<Self> {
        serde_json::from_slice(json).map_err(|e| BranchpackError::ConfigParseFailed {
            path: LOCKFILE_FILE.to_string(),
            reason: e.to_string(),
        })
    }

    /// Serialize lockfile to JSON string (pretty-printed)
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| BranchpackError::ConfigParseFailed {
            path: LOCKFILE_FILE.to_string(),
            reason: e.to_string(),
        })
    }

    /// Number of dependency nodes below this one
    pub fn transitive_count(&self) -> usize {
        self.dependencies
            .values()
            .map(|node| 1 + node.transitive_count())
            .sum()
    }
}
