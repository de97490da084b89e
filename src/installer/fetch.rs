//! Content retrieval: materialising a branch in the packages directory

use std::path::{Component, Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use super::Installer;
use crate::error::{BranchpackError, Result};
use crate::repository::{EntryKind, TreeEntry};
use crate::transaction::Transaction;

impl Installer {
    /// Write the whole tree of branch `name` into its package directory
    ///
    /// The directory is tracked by `transaction` as soon as it exists.
    /// Directories are created first, then plain files are fetched on the
    /// worker pool, then archives are extracted into the package root.
    /// Returns only once every fetch finished or one of them failed.
    pub(crate) fn retrieve(&self, name: &str, transaction: &mut Transaction) -> Result<()> {
        let entries = self.repository.get_branch_tree(name)?;
        let root = self.package_dir(name);

        self.fs.create_dir(&root)?;
        transaction.track_dir_created(&root);

        let mut files: Vec<(&TreeEntry, PathBuf)> = Vec::new();
        let mut archives: Vec<&TreeEntry> = Vec::new();

        for entry in &entries {
            let dest = root.join(relative_path(name, &entry.path)?);
            match entry.kind {
                EntryKind::Directory => self.fs.create_dir(&dest)?,
                EntryKind::File if entry.is_archive() => archives.push(entry),
                EntryKind::File => files.push((entry, dest)),
            }
        }

        debug!(
            "Fetching {} files and {} archives of '{}'",
            files.len(),
            archives.len(),
            name
        );

        self.pool.install(|| {
            files.par_iter().try_for_each(|(entry, dest)| {
                let contents = self.repository.get_file_content(&entry.path, name)?;
                self.fs.write_file(dest, &contents)
            })
        })?;

        for entry in archives {
            debug!("Extracting {}", entry.path);
            let archive = self.repository.get_file_content(&entry.path, name)?;
            self.fs.extract_archive(&archive, &root)?;
        }

        Ok(())
    }
}

/// `path` as a relative path that stays inside the package directory
fn relative_path(package: &str, path: &str) -> Result<PathBuf> {
    let relative = Path::new(path);
    let confined = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));

    if path.is_empty() || !confined {
        return Err(BranchpackError::ContentRetrievalFailed {
            package: package.to_string(),
            reason: format!("refusing to write outside the package directory: '{path}'"),
        });
    }

    Ok(relative.to_path_buf())
}
