//! Configuration file handling for branchpack
//!
//! This module contains data structures for:
//! - `pack.json` - Package manifest
//! - `pack.lock` - Lockfile with the resolved dependency tree
//! - `branchpack.yaml` - Tool settings

pub mod lockfile;
pub mod manifest;
pub mod settings;

// Re-export commonly used types
pub use lockfile::{LOCKFILE_FILE, Lockfile};
pub use manifest::{MANIFEST_FILE, Manifest};
pub use settings::{Settings, SettingsFile};
