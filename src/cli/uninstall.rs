use clap::Parser;

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
pub struct UninstallArgs {
    /// Name of an installed package
    pub package: String,
}
