//! Install command implementation

use console::Style;

use crate::cli::InstallArgs;
use crate::config::Settings;
use crate::error::Result;

/// Run install command
pub fn run(settings: &Settings, args: InstallArgs) -> Result<()> {
    let installer = super::installer(settings)?;
    let lockfile = installer.install(&args.package)?;

    println!(
        "{} {} {}",
        Style::new().green().bold().apply_to("Installed"),
        Style::new().bold().apply_to(&args.package),
        lockfile.version
    );

    let dependencies = lockfile.transitive_count();
    if dependencies > 0 {
        println!("  with {}", super::dependency_count(dependencies));
    }

    Ok(())
}
