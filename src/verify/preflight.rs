//! Pre-flight checks performed before running the pipeline.
//!
//! Unlike `rules`, these functions perform I/O (checking that projects
//! exist, probing the dotnet executable).

use crate::error::{Error, Result};
use crate::pipeline::Layout;
use crate::runner::DotnetCli;
use crate::verify::rules::validate_dependency_name;

/// Checks the layout before any step mutates anything.
///
/// # Errors
///
/// - `InvalidName` if the dependency is not a valid package id
/// - `MissingPath` if the library project, tool project or demo directory
///   is missing
///
/// An unusable dotnet executable is only logged: the first command that
/// needs it fails loudly anyway.
pub fn preflight_checks(layout: &Layout, dotnet: &DotnetCli) -> Result<()> {
    validate_dependency_name(&layout.dependency)?;

    if !layout.library_project.is_file() {
        return Err(Error::MissingPath(
            layout.library_project.clone(),
            "Library project",
        ));
    }

    if !layout.tool_project.is_file() {
        return Err(Error::MissingPath(
            layout.tool_project.clone(),
            "Tool project",
        ));
    }

    if !layout.demo_dir.is_dir() {
        return Err(Error::MissingPath(
            layout.demo_dir.clone(),
            "Demonstration directory",
        ));
    }

    if !dotnet.check_available() {
        log::warn!("dotnet does not seem usable; the pack step will likely fail");
    }

    Ok(())
}
