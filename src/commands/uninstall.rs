//! Uninstall command implementation

use console::Style;

use crate::cli::UninstallArgs;
use crate::config::Settings;
use crate::error::Result;

/// Run uninstall command
pub fn run(settings: &Settings, args: UninstallArgs) -> Result<()> {
    super::installer(settings)?.uninstall(&args.package)?;

    println!(
        "{} {}",
        Style::new().green().bold().apply_to("Uninstalled"),
        Style::new().bold().apply_to(&args.package)
    );
    Ok(())
}
