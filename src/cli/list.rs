use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List installed packages:\n    branchpack list\n\n\
                  Show dependency counts from each lockfile:\n    branchpack list --detailed")]
pub struct ListArgs {
    /// Show the number of locked dependencies of each package
    #[arg(long)]
    pub detailed: bool,
}
