//! Remote package repository interface
//!
//! Every package is a branch of one repository. The installer reads branch
//! trees, file contents and manifests through [`RepositoryClient`];
//! [`crate::git::GitRepository`] is the git-backed implementation.

use crate::error::Result;

/// Kind of an entry in a branch tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// An entry of a branch tree, with a `/`-separated path relative to the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: String,
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }

    /// Whether this entry is a gzip-compressed tarball to be extracted
    pub fn is_archive(&self) -> bool {
        self.kind == EntryKind::File
            && (self.path.ends_with(".tar.gz") || self.path.ends_with(".tgz"))
    }
}

/// Read access to the package repository
///
/// Implementations are shared between fetch workers and must be thread-safe.
/// Errors are reported as-is; callers never retry.
pub trait RepositoryClient: Send + Sync {
    /// All entries of `branch`, parents before their children
    fn get_branch_tree(&self, branch: &str) -> Result<Vec<TreeEntry>>;

    /// Contents of the file at `path` on `git_ref`
    fn get_file_content(&self, path: &str, git_ref: &str) -> Result<Vec<u8>>;

    /// Raw pack.json of `branch`, or `None` if the branch has none
    fn get_manifest(&self, branch: &str) -> Result<Option<Vec<u8>>>;
}
