//! Post-install command execution
//!
//! Manifest scripts are handed to a [`CommandRunner`]. [`ShellRunner`] runs
//! them through the host shell; other runners can restrict or sandbox them
//! without the installer noticing.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{BranchpackError, Result};

/// Exit code reported when a command was terminated by a signal
pub const SIGNALLED_EXIT_CODE: i32 = -1;

/// Executes a single command string
pub trait CommandRunner: Send + Sync {
    /// Run `command` with `cwd` as working directory and return its exit code
    fn run(&self, command: &str, cwd: &Path) -> Result<i32>;
}

/// Runs commands through `sh -c` (`cmd /C` on Windows)
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, cwd: &Path) -> Result<i32> {
        debug!("Running `{}` in {}", command, cwd.display());

        let status = shell(command)
            .current_dir(cwd)
            .status()
            .map_err(|e| BranchpackError::IoError {
                message: format!("Failed to spawn `{command}`: {e}"),
            })?;

        Ok(status.code().unwrap_or(SIGNALLED_EXIT_CODE))
    }
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
