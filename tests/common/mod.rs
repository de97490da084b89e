//! Common test utilities for branchpack integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use assert_cmd::Command;
use git2::{Oid, Repository, Signature};
use tempfile::TempDir;

/// A working directory plus a bare package repository and a cache directory
pub struct TestWorkspace {
    pub temp: TempDir,
    /// Directory the binary runs in
    pub path: PathBuf,
    remote: PathBuf,
    cache: PathBuf,
}

impl TestWorkspace {
    /// Create a new test workspace with an empty package repository
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("work");
        let remote = temp.path().join("remote.git");
        let cache = temp.path().join("cache");

        std::fs::create_dir_all(&path).expect("Failed to create workspace directory");
        Repository::init_bare(&remote).expect("Failed to init package repository");

        Self {
            temp,
            path,
            remote,
            cache,
        }
    }

    /// `branchpack` running in the workspace against the test repository
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("branchpack").expect("Failed to find branchpack binary");
        cmd.current_dir(&self.path)
            .env_remove("RUST_LOG")
            .env_remove("BRANCHPACK_PACKAGES_DIR")
            .env_remove("BRANCHPACK_JOBS")
            .env("BRANCHPACK_REPO", &self.remote)
            .env("BRANCHPACK_CACHE_DIR", &self.cache);
        cmd
    }

    /// Commit `files` as the full contents of branch `name`
    pub fn publish(&self, name: &str, files: &[(&str, &str)]) {
        let repo = Repository::open_bare(&self.remote).expect("Failed to open package repository");
        let files: Vec<(String, Vec<u8>)> = files
            .iter()
            .map(|(path, contents)| ((*path).to_string(), contents.as_bytes().to_vec()))
            .collect();
        let tree = repo
            .find_tree(write_tree(&repo, &files))
            .expect("Failed to find tree");

        let refname = format!("refs/heads/{name}");
        let parent = repo
            .find_reference(&refname)
            .ok()
            .and_then(|r| r.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();

        let sig = Signature::now("Test", "test@test.com").expect("Failed to create signature");
        repo.commit(Some(&refname), &sig, &sig, "Publish package", &tree, &parents)
            .expect("Failed to commit");
    }

    /// Publish a package whose only file is its pack.json
    pub fn publish_manifest(&self, name: &str, manifest: &serde_json::Value) {
        self.publish(name, &[("pack.json", &manifest.to_string())]);
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Parse a JSON file from workspace
    pub fn read_json(&self, path: &str) -> serde_json::Value {
        serde_json::from_str(&self.read_file(path)).expect("Failed to parse JSON")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }
}

fn write_tree(repo: &Repository, files: &[(String, Vec<u8>)]) -> Oid {
    let mut builder = repo.treebuilder(None).expect("Failed to create tree builder");
    let mut subdirs: BTreeMap<&str, Vec<(String, Vec<u8>)>> = BTreeMap::new();

    for (path, contents) in files {
        match path.split_once('/') {
            Some((dir, rest)) => subdirs
                .entry(dir)
                .or_default()
                .push((rest.to_string(), contents.clone())),
            None => {
                let blob = repo.blob(contents).expect("Failed to write blob");
                builder
                    .insert(path.as_str(), blob, 0o100_644)
                    .expect("Failed to insert blob");
            }
        }
    }

    for (dir, entries) in subdirs {
        let oid = write_tree(repo, &entries);
        builder
            .insert(dir, oid, 0o040_000)
            .expect("Failed to insert tree");
    }

    builder.write().expect("Failed to write tree")
}
