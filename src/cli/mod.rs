//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - uninstall: Uninstall command arguments
//! - update: Update command arguments
//! - info: Info command arguments
//! - list: List command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::SettingsFile;

pub mod info;
pub mod install;
pub mod list;
pub mod uninstall;
pub mod update;

pub use info::InfoArgs;
pub use install::InstallArgs;
pub use list::ListArgs;
pub use uninstall::UninstallArgs;
pub use update::UpdateArgs;

/// branchpack - branch-based package installer
///
/// Every package is a branch of one git repository.
#[derive(Parser, Debug)]
#[command(
    name = "branchpack",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Branch-based package installer",
    long_about = "branchpack installs packages that live as branches of a single git repository, \
                  resolves their dependencies recursively and records the resolved tree in a \
                  pack.lock next to each package.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  branchpack install demo      \x1b[90m# Install demo and its dependencies\x1b[0m\n   \
                  branchpack update demo       \x1b[90m# Reinstall demo if a newer version exists\x1b[0m\n   \
                  branchpack info demo         \x1b[90m# Show package metadata\x1b[0m\n   \
                  branchpack list              \x1b[90m# List installed packages\x1b[0m\n   \
                  branchpack uninstall demo    \x1b[90m# Remove demo\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Package repository (git URL or local path)
    #[arg(long, global = true, env = "BRANCHPACK_REPO", value_name = "URL")]
    pub repo: Option<String>,

    /// Directory holding installed packages
    #[arg(long, global = true, env = "BRANCHPACK_PACKAGES_DIR", value_name = "DIR")]
    pub packages_dir: Option<PathBuf>,

    /// Directory for the repository mirror
    #[arg(long, global = true, env = "BRANCHPACK_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Number of files fetched concurrently
    #[arg(long, short = 'j', global = true, env = "BRANCHPACK_JOBS", value_name = "N")]
    pub jobs: Option<usize>,

    /// Settings file (defaults to ./branchpack.yaml)
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Settings given on the command line or through the environment
    pub fn settings_overrides(&self) -> SettingsFile {
        SettingsFile {
            repository: self.repo.clone(),
            packages_dir: self.packages_dir.clone(),
            cache_dir: self.cache_dir.clone(),
            jobs: self.jobs,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a package and its dependencies
    Install(InstallArgs),

    /// Remove an installed package
    Uninstall(UninstallArgs),

    /// Reinstall a package if its branch has a newer version
    Update(UpdateArgs),

    /// Show package information
    Info(InfoArgs),

    /// List installed packages
    List(ListArgs),
}
