//! Post-install scripts

use tracing::{debug, info};

use super::Installer;
use crate::error::{BranchpackError, Result};

/// What running a package's scripts amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOutcome {
    /// The manifest declares no scripts
    NoScripts,

    /// Every script exited with status 0
    Succeeded { count: usize },

    /// Script `key` exited with a non-zero status; later scripts did not run
    Failed {
        key: u64,
        command: String,
        status: i32,
    },
}

impl ScriptOutcome {
    /// Turn a failed run into [`BranchpackError::ScriptExecutionFailed`]
    pub fn into_result(self, package: &str) -> Result<()> {
        match self {
            ScriptOutcome::NoScripts | ScriptOutcome::Succeeded { .. } => Ok(()),
            ScriptOutcome::Failed {
                key,
                command,
                status,
            } => Err(BranchpackError::ScriptExecutionFailed {
                package: package.to_string(),
                key,
                command,
                status,
            }),
        }
    }
}

impl Installer {
    /// Run the scripts of installed package `name` in ascending key order
    ///
    /// The manifest is read from disk; a missing or malformed manifest is an
    /// error.
    pub(crate) fn run_scripts(&self, name: &str) -> Result<ScriptOutcome> {
        let manifest = self.read_local_manifest(name)?;
        let scripts = manifest.ordered_scripts(name)?;
        if scripts.is_empty() {
            debug!("'{}' declares no scripts", name);
            return Ok(ScriptOutcome::NoScripts);
        }

        let dir = self.package_dir(name);
        for (key, command) in &scripts {
            info!("Running script {} of '{}': {}", key, name, command);
            let status = self.runner.run(command, &dir)?;
            if status != 0 {
                return Ok(ScriptOutcome::Failed {
                    key: *key,
                    command: (*command).to_string(),
                    status,
                });
            }
        }

        Ok(ScriptOutcome::Succeeded {
            count: scripts.len(),
        })
    }
}
