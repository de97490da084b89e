//! Info command implementation
//!
//! Shows the metadata of an installed package's pack.json.

use console::Style;

use crate::cli::InfoArgs;
use crate::config::{Manifest, Settings};
use crate::error::Result;

/// Run info command
pub fn run(settings: &Settings, args: InfoArgs) -> Result<()> {
    let manifest = super::installer(settings)?.info(&args.package)?;
    display_manifest(&args.package, &manifest);
    Ok(())
}

fn display_manifest(package: &str, manifest: &Manifest) {
    let label = Style::new().bold();
    let name = manifest.name.as_deref().unwrap_or(package);

    println!(
        "{} {}",
        Style::new().bold().yellow().apply_to(name),
        manifest.version.as_deref().unwrap_or("(no version)")
    );

    if let Some(description) = &manifest.description {
        println!("  {} {}", label.apply_to("Description:"), description);
    }

    match (&manifest.author, &manifest.author_email) {
        (Some(author), Some(email)) => {
            println!("  {} {} <{}>", label.apply_to("Author:"), author, email);
        }
        (Some(author), None) => println!("  {} {}", label.apply_to("Author:"), author),
        (None, Some(email)) => println!("  {} <{}>", label.apply_to("Author:"), email),
        (None, None) => {}
    }

    if let Some(license) = &manifest.license {
        println!("  {} {}", label.apply_to("License:"), license);
    }
    if !manifest.keywords.is_empty() {
        println!("  {} {}", label.apply_to("Keywords:"), manifest.keywords.join(", "));
    }
    if let Some(homepage) = &manifest.homepage {
        println!("  {} {}", label.apply_to("Homepage:"), homepage);
    }

    if !manifest.dependencies.is_empty() {
        println!("  {}", label.apply_to("Dependencies:"));
        for dependency in &manifest.dependencies {
            println!(
                "    {} {}",
                Style::new().cyan().apply_to(&dependency.name),
                dependency.constraint.as_deref().unwrap_or("*")
            );
        }
    }

    if !manifest.scripts.is_empty() {
        println!("  {}", label.apply_to("Scripts:"));
        for (key, command) in &manifest.scripts {
            println!("    {} {}", Style::new().cyan().apply_to(key), command);
        }
    }
}
