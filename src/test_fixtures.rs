//! Test fixtures and utilities for reducing test setup duplication.
//!
//! This module provides:
//! - temp directories that never land under the current working directory
//! - [`RemoteRepo`], a bare git repository to fetch package branches from
//! - [`MemoryRepository`] and [`RecordingRunner`], in-memory collaborators
//!   for installer tests
//! - [`tar_gz`], to build package archives

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use flate2::Compression;
use flate2::write::GzEncoder;
use git2::{Oid, Repository, Signature};
use tempfile::TempDir;

use crate::config::MANIFEST_FILE;
use crate::error::{BranchpackError, Result};
use crate::repository::{RepositoryClient, TreeEntry};
use crate::script::CommandRunner;

/// Absolute base for temp directories, even when `TMPDIR` is relative
fn temp_dir_base() -> PathBuf {
    let dir = std::env::temp_dir();
    if dir.is_absolute() {
        dir
    } else if cfg!(windows) {
        std::env::var_os("TEMP").map_or_else(|| PathBuf::from(r"C:\Windows\Temp"), PathBuf::from)
    } else {
        PathBuf::from("/tmp")
    }
}

/// Create a temp directory in the system temp location.
///
/// Never created under the current working directory.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(temp_dir_base()).expect("Failed to create temp directory")
}

/// Build a gzip-compressed tarball from `(path, contents)` pairs
pub fn tar_gz(files: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, path, *contents).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// A bare git repository whose branches are packages
pub struct RemoteRepo {
    _temp: TempDir,
    path: PathBuf,
}

impl RemoteRepo {
    #[must_use]
    pub fn new() -> Self {
        let temp = create_temp_dir();
        let path = temp.path().join("remote.git");
        Repository::init_bare(&path).expect("Failed to init bare repository");
        Self { _temp: temp, path }
    }

    /// URL (a local path) to fetch from
    pub fn url(&self) -> String {
        self.path.display().to_string()
    }

    /// Commit `files` as the full contents of `branch`, on top of its current tip
    pub fn commit_branch(&self, branch: &str, files: &[(&str, &[u8])]) {
        let repo = Repository::open_bare(&self.path).unwrap();
        let owned: Vec<(String, Vec<u8>)> = files
            .iter()
            .map(|(path, contents)| ((*path).to_string(), contents.to_vec()))
            .collect();
        let tree = repo.find_tree(write_tree(&repo, &owned)).unwrap();

        let refname = format!("refs/heads/{branch}");
        let parent = repo
            .find_reference(&refname)
            .ok()
            .and_then(|r| r.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();

        let sig = Signature::now("Test", "test@test.com").unwrap();
        repo.commit(Some(&refname), &sig, &sig, "Update package", &tree, &parents)
            .unwrap();
    }
}

impl Default for RemoteRepo {
    fn default() -> Self {
        Self::new()
    }
}

fn write_tree(repo: &Repository, files: &[(String, Vec<u8>)]) -> Oid {
    let mut builder = repo.treebuilder(None).unwrap();
    let mut subdirs: BTreeMap<&str, Vec<(String, Vec<u8>)>> = BTreeMap::new();

    for (path, contents) in files {
        match path.split_once('/') {
            Some((dir, rest)) => subdirs
                .entry(dir)
                .or_default()
                .push((rest.to_string(), contents.clone())),
            None => {
                let blob = repo.blob(contents).unwrap();
                builder.insert(path.as_str(), blob, 0o100_644).unwrap();
            }
        }
    }

    for (dir, entries) in subdirs {
        let oid = write_tree(repo, &entries);
        builder.insert(dir, oid, 0o040_000).unwrap();
    }

    builder.write().unwrap()
}

/// In-memory [`RepositoryClient`]
#[derive(Default)]
pub struct MemoryRepository {
    branches: Mutex<HashMap<String, BTreeMap<String, Vec<u8>>>>,
    tree_requests: Mutex<Vec<String>>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a branch holding only `manifest` as pack.json
    pub fn add_package(&self, branch: &str, manifest: &serde_json::Value) {
        self.branches.lock().unwrap().insert(
            branch.to_string(),
            BTreeMap::from([(MANIFEST_FILE.to_string(), manifest.to_string().into_bytes())]),
        );
    }

    /// Add a file to an existing or new branch
    pub fn add_file(&self, branch: &str, path: &str, contents: &[u8]) {
        self.branches
            .lock()
            .unwrap()
            .entry(branch.to_string())
            .or_default()
            .insert(path.to_string(), contents.to_vec());
    }

    /// Branches whose tree was requested, in order
    pub fn tree_requests(&self) -> Vec<String> {
        self.tree_requests.lock().unwrap().clone()
    }

    fn files(&self, branch: &str) -> Result<BTreeMap<String, Vec<u8>>> {
        self.branches
            .lock()
            .unwrap()
            .get(branch)
            .cloned()
            .ok_or_else(|| BranchpackError::PackageNotFound {
                package: branch.to_string(),
            })
    }
}

impl RepositoryClient for MemoryRepository {
    fn get_branch_tree(&self, branch: &str) -> Result<Vec<TreeEntry>> {
        self.tree_requests.lock().unwrap().push(branch.to_string());
        let files = self.files(branch)?;

        let directories: BTreeSet<String> = files
            .keys()
            .flat_map(|path| {
                let parts: Vec<&str> = path.split('/').collect();
                (1..parts.len())
                    .map(|n| parts[..n].join("/"))
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(directories
            .into_iter()
            .map(TreeEntry::directory)
            .chain(files.into_keys().map(TreeEntry::file))
            .collect())
    }

    fn get_file_content(&self, path: &str, git_ref: &str) -> Result<Vec<u8>> {
        self.files(git_ref)?
            .remove(path)
            .ok_or_else(|| BranchpackError::ContentRetrievalFailed {
                package: git_ref.to_string(),
                reason: format!("'{path}' does not exist"),
            })
    }

    fn get_manifest(&self, branch: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.files(branch)?.remove(MANIFEST_FILE))
    }
}

/// [`CommandRunner`] that records commands instead of running them
#[derive(Default)]
pub struct RecordingRunner {
    exit_codes: HashMap<String, i32>,
    commands: Mutex<Vec<(String, PathBuf)>>,
}

impl RecordingRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `command` exit with `code`
    #[must_use]
    pub fn exiting(mut self, command: &str, code: i32) -> Self {
        self.exit_codes.insert(command.to_string(), code);
        self
    }

    /// Commands run so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .map(|(command, _)| command.clone())
            .collect()
    }

    /// Working directories of the commands run so far
    pub fn working_dirs(&self) -> Vec<PathBuf> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .map(|(_, cwd)| cwd.clone())
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &str, cwd: &Path) -> Result<i32> {
        self.commands
            .lock()
            .unwrap()
            .push((command.to_string(), cwd.to_path_buf()));
        Ok(self.exit_codes.get(command).copied().unwrap_or(0))
    }
}
