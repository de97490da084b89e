//! branchpack - branch-based package installer
//!
//! Installs packages that live as branches of one git repository, resolves
//! their dependencies recursively and records the resolved tree in a lockfile.

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod error;
mod fs;
mod git;
mod installer;
mod repository;
mod resolver;
mod script;
mod transaction;
mod update;
mod version;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};
use config::Settings;
use error::{BranchpackError, Result};

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let cwd = std::env::current_dir().map_err(|e| BranchpackError::IoError {
        message: format!("Failed to get current directory: {}", e),
    })?;

    Settings::load(&cwd, cli.config.as_deref(), cli.settings_overrides())
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;

    match cli.command {
        Commands::Install(args) => commands::install::run(&settings, args),
        Commands::Uninstall(args) => commands::uninstall::run(&settings, args),
        Commands::Update(args) => commands::update::run(&settings, args),
        Commands::Info(args) => commands::info::run(&settings, args),
        Commands::List(args) => commands::list::run(&settings, args),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if let Some(help) = e.root_cause().help() {
            eprintln!("  help: {}", help);
        }
        std::process::exit(1);
    }
}
