//! Transaction support for atomic installs
//!
//! A top-level install may materialise several packages: the requested one
//! and any dependency that was not installed yet. Every package directory
//! created on the way is tracked here, so a failure anywhere removes all of
//! them and leaves the packages directory as it was.
//!
//! ## Usage
//!
//! ```ignore
//! let mut transaction = Transaction::new(fs);
//! fs.create_dir(&dir)?;
//! transaction.track_dir_created(&dir);
//!
//! // On success:
//! transaction.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // rollback happens automatically
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::fs::Filesystem;

/// A transaction over package directories
pub struct Transaction {
    fs: Arc<dyn Filesystem>,

    /// Package directories created during this transaction, in creation order
    created_dirs: Vec<PathBuf>,

    /// Whether the transaction has been committed
    committed: bool,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self {
            fs,
            created_dirs: Vec::new(),
            committed: false,
        }
    }

    /// Track a package directory that was created during this transaction
    pub fn track_dir_created(&mut self, path: impl Into<PathBuf>) {
        self.created_dirs.push(path.into());
    }

    /// Commit the transaction (prevent rollback)
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Remove every tracked directory, newest first
    ///
    /// All directories are attempted; the first failure is returned.
    pub fn rollback(&mut self) -> Result<()> {
        if self.committed {
            return Ok(());
        }

        let mut first_error = None;
        while let Some(dir) = self.created_dirs.pop() {
            if !self.fs.exists(&dir) {
                continue;
            }

            debug!("Rolling back {}", dir.display());
            if let Err(e) = self.fs.delete_recursive(&dir) {
                warn!("Failed to remove {}: {}", dir.display(), e);
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed {
            // Automatic rollback on drop if not committed
            if let Err(e) = self.rollback() {
                warn!("Rollback failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::fs::LocalFs;
    use crate::test_fixtures::create_temp_dir;

    fn make_package(root: &Path, name: &str) -> PathBuf {
        let dir = root.join(name);
        std::fs::create_dir_all(dir.join("src")).unwrap();
        std::fs::write(dir.join("src/file.txt"), "x").unwrap();
        dir
    }

    #[test]
    fn test_commit_keeps_directories() {
        let temp = create_temp_dir();
        let dir = make_package(temp.path(), "demo");

        let mut transaction = Transaction::new(Arc::new(LocalFs));
        transaction.track_dir_created(&dir);
        transaction.commit();

        assert!(dir.exists());
    }

    #[test]
    fn test_explicit_rollback_removes_all_tracked() {
        let temp = create_temp_dir();
        let first = make_package(temp.path(), "first");
        let second = make_package(temp.path(), "second");
        let untracked = make_package(temp.path(), "untracked");

        let mut transaction = Transaction::new(Arc::new(LocalFs));
        transaction.track_dir_created(&first);
        transaction.track_dir_created(&second);

        transaction.rollback().unwrap();

        assert!(!first.exists());
        assert!(!second.exists());
        assert!(untracked.exists());
    }

    #[test]
    fn test_drop_without_commit_rolls_back() {
        let temp = create_temp_dir();
        let dir = make_package(temp.path(), "demo");

        {
            let mut transaction = Transaction::new(Arc::new(LocalFs));
            transaction.track_dir_created(&dir);
        }

        assert!(!dir.exists());
    }

    #[test]
    fn test_rollback_skips_already_removed() {
        let temp = create_temp_dir();
        let dir = make_package(temp.path(), "demo");

        let mut transaction = Transaction::new(Arc::new(LocalFs));
        transaction.track_dir_created(&dir);
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(transaction.rollback().is_ok());
    }
}
