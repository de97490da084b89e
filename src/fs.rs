//! Filesystem access used by the installer
//!
//! The installer only touches the disk through [`Filesystem`], so tests can
//! observe or fail individual operations. [`LocalFs`] is the real
//! implementation.

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::read::GzDecoder;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::error::{BranchpackError, Result};

/// Mode of files written by [`LocalFs::write_file`]
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Filesystem operations needed to materialise and remove packages
pub trait Filesystem: Send + Sync {
    /// Create a directory and any missing parents
    fn create_dir(&self, path: &Path) -> Result<()>;

    /// Write `contents` to `path`, replacing it atomically
    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Read a file, or `None` if it does not exist
    fn read_file(&self, path: &Path) -> Result<Option<Vec<u8>>>;

    /// Remove `path` and everything below it, leaves first
    fn delete_recursive(&self, path: &Path) -> Result<()>;

    /// Unpack a gzip-compressed tar archive into `dest`
    fn extract_archive(&self, archive: &[u8], dest: &Path) -> Result<()>;

    /// Check whether `path` exists
    fn exists(&self, path: &Path) -> bool;

    /// Names of the subdirectories of `path`, sorted
    fn list_dirs(&self, path: &Path) -> Result<Vec<String>>;
}

/// [`Filesystem`] backed by the local disk
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn create_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| BranchpackError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let write_failed = |e: std::io::Error| BranchpackError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(write_failed)?;

        let mut temp = NamedTempFile::new_in(parent).map_err(write_failed)?;
        temp.write_all(contents).map_err(write_failed)?;
        // Temp files are created 0600; installed files must be readable by others
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(fs::Permissions::from_mode(FILE_MODE))
                .map_err(write_failed)?;
        }
        temp.persist(path).map_err(|e| write_failed(e.error))?;
        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BranchpackError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn delete_recursive(&self, path: &Path) -> Result<()> {
        // contents_first yields every entry before its parent directory,
        // and the root itself last.
        for entry in WalkDir::new(path).contents_first(true) {
            let entry = entry.map_err(|e| BranchpackError::IoError {
                message: format!("Failed to walk {}: {}", path.display(), e),
            })?;

            let removed = if entry.file_type().is_dir() {
                fs::remove_dir(entry.path())
            } else {
                fs::remove_file(entry.path())
            };

            removed.map_err(|e| BranchpackError::IoError {
                message: format!("Failed to remove {}: {}", entry.path().display(), e),
            })?;
        }

        Ok(())
    }

    fn extract_archive(&self, archive: &[u8], dest: &Path) -> Result<()> {
        self.create_dir(dest)?;

        let mut archive = tar::Archive::new(GzDecoder::new(archive));
        archive
            .unpack(dest)
            .map_err(|e| BranchpackError::FileWriteFailed {
                path: dest.display().to_string(),
                reason: format!("Failed to extract archive: {e}"),
            })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_dirs(&self, path: &Path) -> Result<Vec<String>> {
        if !path.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(path).map_err(|e| BranchpackError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut names: Vec<String> = entries
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_dir()))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        Ok(names)
    }
}
