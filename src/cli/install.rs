use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install a package and its dependencies:\n    branchpack install demo\n\n\
                   Install from another repository:\n    branchpack --repo https://example.com/pkg.git install demo")]
pub struct InstallArgs {
    /// Package (branch) name
    pub package: String,
}
