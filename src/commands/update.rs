//! Update command implementation

use console::Style;

use crate::cli::UpdateArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::update::UpdateOutcome;

/// Run update command
pub fn run(settings: &Settings, args: UpdateArgs) -> Result<()> {
    let installer = super::installer(settings)?;
    let name = Style::new().bold().apply_to(&args.branch);

    match installer.update(&args.branch)? {
        UpdateOutcome::Updated { from, to } => println!(
            "{} {} {} -> {}",
            Style::new().green().bold().apply_to("Updated"),
            name,
            from,
            to
        ),
        UpdateOutcome::UpToDate { version } => println!(
            "{} {} is up to date",
            name,
            Style::new().dim().apply_to(version)
        ),
    }

    Ok(())
}
