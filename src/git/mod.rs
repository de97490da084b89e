//! Git-backed package repository
//!
//! This module handles:
//! - Keeping a bare mirror of the package repository in the cache directory
//! - Fetching package branches into the mirror on first use
//! - Listing branch trees and reading file contents from the mirror
//!
//! Authentication is delegated entirely to git's native system
//! (SSH agent and keys, credential helpers).

mod auth;
mod error;
mod url;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use git2::{FetchOptions, ObjectType, RemoteCallbacks, Repository, Tree, TreeWalkMode, TreeWalkResult};
use tracing::debug;

use crate::config::MANIFEST_FILE;
use crate::error::{BranchpackError, Result};
use crate::repository::{RepositoryClient, TreeEntry};

/// Subdirectory of the cache directory holding repository mirrors
const MIRRORS_DIR: &str = "mirrors";

/// Package repository read from a bare git mirror
#[derive(Debug)]
pub struct GitRepository {
    /// Remote URL or local path of the package repository
    url: String,

    /// Path of the bare mirror
    mirror: PathBuf,

    /// Branches already fetched by this instance
    fetched: Mutex<HashSet<String>>,
}

impl GitRepository {
    /// Create a client for `url` mirroring into `cache_dir`
    ///
    /// Nothing touches the disk or the network until the first request.
    pub fn new(url: impl Into<String>, cache_dir: &Path) -> Self {
        let url = url.into();
        let mirror = cache_dir.join(MIRRORS_DIR).join(url::mirror_key(&url));
        Self {
            url,
            mirror,
            fetched: Mutex::new(HashSet::new()),
        }
    }

    /// Open the mirror, creating it if needed
    fn open(&self) -> Result<Repository> {
        let opened = if self.mirror.join("HEAD").exists() {
            Repository::open_bare(&self.mirror)
        } else {
            std::fs::create_dir_all(&self.mirror).map_err(|e| BranchpackError::FileWriteFailed {
                path: self.mirror.display().to_string(),
                reason: e.to_string(),
            })?;
            Repository::init_bare(&self.mirror)
        };

        opened.map_err(|e| BranchpackError::GitOperationFailed {
            message: format!(
                "Failed to open mirror at {}: {}",
                self.mirror.display(),
                e.message()
            ),
        })
    }

    /// Fetch `branch` into the mirror unless this instance already did
    fn fetch_branch(&self, repo: &Repository, branch: &str) -> Result<()> {
        if self
            .fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(branch)
        {
            return Ok(());
        }

        debug!("Fetching branch {} from {}", branch, self.url);

        let fetch_url = url::normalize_fetch_url(&self.url);
        let mut remote = repo
            .remote_anonymous(&fetch_url)
            .map_err(|e| error::fetch_failed(branch, &e))?;

        let mut callbacks = RemoteCallbacks::new();
        auth::setup_auth_callbacks(&mut callbacks);

        let mut options = FetchOptions::new();
        options.remote_callbacks(callbacks);
        if !url::is_local(&self.url) {
            options.depth(1);
        }

        let refspec = format!("+refs/heads/{branch}:{}", tracking_ref(branch));
        remote
            .fetch(&[refspec.as_str()], Some(&mut options), None)
            .map_err(|e| error::fetch_failed(branch, &e))?;

        self.fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(branch.to_string());
        Ok(())
    }

    /// Root tree of the fetched `branch`
    fn branch_tree<'r>(&self, repo: &'r Repository, branch: &str) -> Result<Tree<'r>> {
        self.fetch_branch(repo, branch)?;

        let reference = repo.find_reference(&tracking_ref(branch)).map_err(|_| {
            BranchpackError::PackageNotFound {
                package: branch.to_string(),
            }
        })?;

        reference
            .peel_to_tree()
            .map_err(|e| error::content_failed(branch, &e))
    }

    /// Read the blob at `path` of `tree`, or `None` if there is no such entry
    fn read_blob(repo: &Repository, tree: &Tree<'_>, branch: &str, path: &str) -> Result<Option<Vec<u8>>> {
        let Ok(entry) = tree.get_path(Path::new(path)) else {
            return Ok(None);
        };

        let blob = entry
            .to_object(repo)
            .and_then(|object| object.peel_to_blob())
            .map_err(|e| error::content_failed(branch, &e))?;

        Ok(Some(blob.content().to_vec()))
    }
}

fn tracking_ref(branch: &str) -> String {
    format!("refs/remotes/origin/{branch}")
}

impl RepositoryClient for GitRepository {
    fn get_branch_tree(&self, branch: &str) -> Result<Vec<TreeEntry>> {
        let repo = self.open()?;
        let tree = self.branch_tree(&repo, branch)?;

        let mut entries = Vec::new();
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            let Some(name) = entry.name() else {
                return TreeWalkResult::Skip;
            };
            let path = format!("{root}{name}");
            match entry.kind() {
                Some(ObjectType::Tree) => entries.push(TreeEntry::directory(path)),
                Some(ObjectType::Blob) => entries.push(TreeEntry::file(path)),
                // Submodule commits have no content in this repository
                _ => {}
            }
            TreeWalkResult::Ok
        })
        .map_err(|e| error::content_failed(branch, &e))?;

        Ok(entries)
    }

    fn get_file_content(&self, path: &str, git_ref: &str) -> Result<Vec<u8>> {
        let repo = self.open()?;
        let tree = self.branch_tree(&repo, git_ref)?;

        Self::read_blob(&repo, &tree, git_ref, path)?.ok_or_else(|| {
            BranchpackError::ContentRetrievalFailed {
                package: git_ref.to_string(),
                reason: format!("'{path}' does not exist on branch {git_ref}"),
            }
        })
    }

    fn get_manifest(&self, branch: &str) -> Result<Option<Vec<u8>>> {
        let repo = self.open()?;
        let tree = self.branch_tree(&repo, branch)?;
        Self::read_blob(&repo, &tree, branch, MANIFEST_FILE)
    }
}
