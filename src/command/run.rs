use super::DotnetArgs;
use crate::error::Result;
use crate::manifest::Mode;
use crate::pipeline::{Layout, LayoutOverrides, Pipeline, PipelineOptions, PipelineOutcome};
use crate::runner::Reproduction;
use crate::verify::preflight_checks;

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Behaviour to set up (`working` = reference enabled, `not-working` = disabled)
    #[arg(value_enum)]
    pub mode: Mode,

    /// Directory holding the solution; layout paths are relative to it
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    #[command(flatten)]
    pub layout: LayoutOverrides,

    #[command(flatten)]
    pub dotnet: DotnetArgs,

    /// Update the manifest in memory only and skip every external command
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Stop after reinstalling the tool
    #[arg(long)]
    pub no_reproduce: bool,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let layout = Layout::resolve(&args.root, args.layout)?;
    let dotnet = args.dotnet.cli();
    log::debug!("Resolved layout: {:?}", layout);

    if layout.has_solution() {
        preflight_checks(&layout, &dotnet)?;
    }

    let options = PipelineOptions {
        dry_run: args.dry_run,
        skip_reproduce: args.no_reproduce,
    };
    let outcome = Pipeline::new(&layout, &dotnet, options).run(args.mode)?;

    let report = match outcome {
        PipelineOutcome::Skipped => {
            println!(
                "{} {}",
                "No solution file found in".yellow(),
                layout.root.display()
            );
            return Ok(());
        }
        PipelineOutcome::Completed(report) => report,
    };

    match &report.reproduction {
        None => println!("\n{}", "✓ Pipeline finished".green().bold()),
        Some(Reproduction::Clean) => {
            println!("\n{}", "✓ Tool ran without exceptions".green().bold())
        }
        Some(Reproduction::ExceptionObserved { excerpt }) => println!(
            "\n{} {}",
            "✗ Runtime exception observed:".red().bold(),
            excerpt
        ),
    }

    match report.matches_expectation() {
        Some(true) => println!(
            "{} {}",
            "Behaviour matches mode".green(),
            args.mode.to_string().bold()
        ),
        Some(false) => println!(
            "{} {}",
            "Behaviour does not match mode".yellow().bold(),
            args.mode.to_string().bold()
        ),
        None => {}
    }

    Ok(())
}
