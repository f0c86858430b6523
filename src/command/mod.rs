pub mod restore;
pub mod run;
pub mod toggle;

use crate::runner::DotnetCli;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Command {
    /// Bump the project version and add or remove a package reference.
    Toggle(toggle::ToggleArgs),
    /// Toggle, repack, reinstall and run the global tool.
    Run(run::RunArgs),
    /// Restore the single project in a directory.
    Restore(restore::RestoreArgs),
}

/// Selects the dotnet executable.
#[derive(Args, Debug, Clone)]
pub struct DotnetArgs {
    /// dotnet executable to run
    #[arg(
        long = "dotnet",
        value_name = "PATH",
        env = "PKGREF_TOGGLE_DOTNET",
        default_value = "dotnet"
    )]
    pub program: PathBuf,
}

impl DotnetArgs {
    pub fn cli(&self) -> DotnetCli {
        DotnetCli::new(&self.program)
    }
}
