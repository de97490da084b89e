use clap::Parser;

/// Arguments for the update command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Reinstall demo if its branch has a newer version:\n    branchpack update demo")]
pub struct UpdateArgs {
    /// Branch of an installed package
    pub branch: String,
}
