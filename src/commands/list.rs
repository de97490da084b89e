//! List command implementation
//!
//! Lists every directory of the packages directory with the version from its
//! pack.json.

use console::Style;
use tracing::debug;

use crate::cli::ListArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::installer::{InstalledPackage, Installer};

/// Run list command
pub fn run(settings: &Settings, args: ListArgs) -> Result<()> {
    let installer = super::installer(settings)?;
    let packages = installer.list()?;

    if packages.is_empty() {
        println!(
            "No packages installed in {}",
            installer.packages_dir().display()
        );
        return Ok(());
    }

    println!("Installed packages ({}):", packages.len());
    for package in &packages {
        display_package(&installer, package, args.detailed);
    }

    Ok(())
}

fn display_package(installer: &Installer, package: &InstalledPackage, detailed: bool) {
    let version = package.version.as_deref().unwrap_or("(no manifest)");
    print!(
        "  {} {}",
        Style::new().bold().yellow().apply_to(&package.name),
        Style::new().dim().apply_to(version)
    );

    if detailed {
        match installer.read_local_lockfile(&package.name) {
            Ok(Some(lockfile)) => print!(
                "  {} locked",
                super::dependency_count(lockfile.transitive_count())
            ),
            Ok(None) => print!("  (no lockfile)"),
            Err(e) => debug!("Skipping lockfile of '{}': {}", package.name, e),
        }
    }

    println!();
}
