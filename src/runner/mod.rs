//! External build, install and reproduce steps.
//!
//! The pipeline only talks to these traits; [`DotnetCli`] shells out to the
//! `dotnet` CLI, tests substitute a recording fake.

pub mod dotnet;

pub use dotnet::DotnetCli;

use crate::error::Result;
use std::path::Path;

/// Restores, packs and installs projects. Every method fails on non-zero exit.
pub trait PackageRunner {
    /// Restores a project's packages.
    fn restore(&self, project: &Path) -> Result<()>;

    /// Restores and packs a project.
    fn build(&self, project: &Path) -> Result<()>;

    /// Updates `tool_package` in the tool manifest of `working_dir`, then
    /// restores the manifest's tools.
    fn install(&self, working_dir: &Path, tool_package: &str) -> Result<()>;
}

/// Runs the installed tool and reports whether it blew up.
pub trait Reproducer {
    fn reproduce(&self, working_dir: &Path, tool_command: &str) -> Result<Reproduction>;
}

/// What running the installed tool showed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reproduction {
    /// Exited successfully with no exception in its output.
    Clean,
    /// A runtime exception was observed.
    ExceptionObserved { excerpt: String },
}

impl Reproduction {
    pub fn is_clean(&self) -> bool {
        matches!(self, Reproduction::Clean)
    }
}
