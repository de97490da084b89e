use clap::Parser;

/// Arguments for the info command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Name of an installed package
    pub package: String,
}
