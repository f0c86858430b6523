use super::DotnetArgs;
use crate::error::Result;
use crate::pipeline::layout::find_files;
use crate::runner::PackageRunner;

use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Arguments for the `restore` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RestoreArgs {
    /// Directory containing the project
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    #[command(flatten)]
    pub dotnet: DotnetArgs,
}

/// Restores the only `*.csproj` in `root`.
///
/// Returns the restored project, or `None` when `root` holds zero or several
/// projects and the restore was skipped.
pub fn restore_single(root: &Path, runner: &impl PackageRunner) -> Result<Option<PathBuf>> {
    let projects = find_files(root, "csproj")?;
    if projects.len() != 1 {
        log::warn!(
            "Expected exactly one project in {}, found {}; skipping restore",
            root.display(),
            projects.len()
        );
        return Ok(None);
    }

    let target = &projects[0];
    log::info!("Running restore on {}", target.display());
    runner.restore(target)?;
    Ok(Some(target.clone()))
}

pub fn execute(args: RestoreArgs) -> Result<()> {
    match restore_single(&args.root, &args.dotnet.cli())? {
        Some(project) => println!(
            "{} {}",
            "✓ Restored".green().bold(),
            project.display()
        ),
        None => println!(
            "{} {}",
            "Skipped restore: no single project in".yellow(),
            args.root.display()
        ),
    }
    Ok(())
}
