//! Command implementations for branchpack CLI

use std::sync::Arc;

use crate::config::Settings;
use crate::error::Result;
use crate::fs::LocalFs;
use crate::git::GitRepository;
use crate::installer::Installer;
use crate::script::ShellRunner;

pub mod info;
pub mod install;
pub mod list;
pub mod uninstall;
pub mod update;

/// Installer for `settings`, backed by git, the local disk and the host shell
fn installer(settings: &Settings) -> Result<Installer> {
    let repository = GitRepository::new(settings.repository.clone(), &settings.cache_dir);

    Installer::new(
        Arc::new(repository),
        Arc::new(LocalFs),
        Arc::new(ShellRunner),
        settings.packages_dir.clone(),
        settings.jobs,
    )
}

fn dependency_count(count: usize) -> String {
    if count == 1 {
        "1 dependency".to_string()
    } else {
        format!("{count} dependencies")
    }
}
