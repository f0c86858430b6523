use crate::error::Result;
use crate::fs::Transaction;
use crate::manifest::{Mode, plan_toggle};
use crate::pipeline::layout::{DEFAULT_DEPENDENCY, find_single};
use crate::verify::validate_dependency_name;

use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Arguments for the `toggle` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ToggleArgs {
    /// Desired state of the reference (`working` = enabled, `not-working` = disabled)
    #[arg(value_enum)]
    pub mode: Mode,

    /// Project file to edit (defaults to the single *.csproj in the current directory)
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Package reference to add or remove
    #[arg(long, value_name = "ID", default_value = DEFAULT_DEPENDENCY)]
    pub dependency: String,

    /// Show what would change without writing the project file
    #[arg(long, short = 'n')]
    pub dry_run: bool,
}

pub fn execute(args: ToggleArgs) -> Result<()> {
    validate_dependency_name(&args.dependency)?;

    let manifest = match args.manifest {
        Some(path) => path,
        None => find_single(&std::env::current_dir()?, "csproj")?,
    };
    log::debug!("Toggling {} in {}", args.dependency, manifest.display());

    let mut txn = Transaction::new(args.dry_run);
    let report = plan_toggle(&manifest, &args.dependency, args.mode, &mut txn)?;
    txn.commit()?;

    println!("{}", report);
    txn.print_summary(manifest.parent().unwrap_or(Path::new(".")));

    if !args.dry_run {
        println!(
            "\n{} {} {}",
            "✓".green().bold(),
            args.dependency.cyan(),
            args.mode
        );
    }

    Ok(())
}
