//! The fixed four-step reproduction pipeline.
//!
//! 1. **UpdateManifest**: bump the tool project's version and toggle the reference
//! 2. **Pack**: restore + pack the library, then the tool
//! 3. **Install**: update the tool in the demo directory's tool manifest
//! 4. **Reproduce**: run the tool and look for a runtime exception
//!
//! Steps run strictly in order; the first failure ends the run. Without a
//! solution file in the root nothing runs at all.

pub mod layout;

pub use layout::{Layout, LayoutOverrides};

use crate::error::Result;
use crate::fs::Transaction;
use crate::manifest::{self, Mode, ToggleReport};
use crate::runner::{PackageRunner, Reproducer, Reproduction};

use colored::Colorize;
use std::fmt;

/// Pipeline steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    UpdateManifest,
    Pack,
    Install,
    Reproduce,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::UpdateManifest => "Update tool manifest",
            Step::Pack => "Pack projects",
            Step::Install => "Install tool",
            Step::Reproduce => "Reproduce",
        };
        write!(f, "{}", name)
    }
}

/// Run options beyond the layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Stage the manifest change and log the commands without running anything.
    pub dry_run: bool,
    /// Stop after installing the tool.
    pub skip_reproduce: bool,
}

/// What a pipeline run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// No solution file in the root.
    Skipped,
    Completed(PipelineReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub toggle: ToggleReport,
    pub steps: Vec<Step>,
    /// `None` when the reproduce step was skipped or the run was a dry run.
    pub reproduction: Option<Reproduction>,
}

impl PipelineReport {
    /// Whether the tool behaved the way the mode predicts: a clean run with the
    /// reference enabled, an exception with it disabled.
    pub fn matches_expectation(&self) -> Option<bool> {
        self.reproduction.as_ref().map(|r| match self.toggle.mode {
            Mode::Enabled => r.is_clean(),
            Mode::Disabled => !r.is_clean(),
        })
    }
}

/// Drives the four steps against a runner.
pub struct Pipeline<'a, R> {
    layout: &'a Layout,
    runner: &'a R,
    options: PipelineOptions,
}

impl<'a, R> Pipeline<'a, R>
where
    R: PackageRunner + Reproducer,
{
    pub fn new(layout: &'a Layout, runner: &'a R, options: PipelineOptions) -> Self {
        Self {
            layout,
            runner,
            options,
        }
    }

    pub fn run(&self, mode: Mode) -> Result<PipelineOutcome> {
        if !self.layout.has_solution() {
            log::warn!(
                "No solution file in {}, skipping pipeline",
                self.layout.root.display()
            );
            return Ok(PipelineOutcome::Skipped);
        }

        let mut steps = Vec::new();

        announce(Step::UpdateManifest);
        let mut txn = Transaction::new(self.options.dry_run);
        let toggle = manifest::plan_toggle(
            &self.layout.tool_project,
            &self.layout.dependency,
            mode,
            &mut txn,
        )?;
        txn.commit()?;
        println!("{}", toggle);
        txn.print_summary(&self.layout.root);
        steps.push(Step::UpdateManifest);

        if self.options.dry_run {
            log::info!("Would pack {}", self.layout.library_project.display());
            log::info!("Would pack {}", self.layout.tool_project.display());
            log::info!(
                "Would install {} in {}",
                self.layout.tool_package,
                self.layout.demo_dir.display()
            );
            return Ok(PipelineOutcome::Completed(PipelineReport {
                toggle,
                steps,
                reproduction: None,
            }));
        }

        announce(Step::Pack);
        self.runner.build(&self.layout.library_project)?;
        self.runner.build(&self.layout.tool_project)?;
        steps.push(Step::Pack);

        announce(Step::Install);
        self.runner
            .install(&self.layout.demo_dir, &self.layout.tool_package)?;
        steps.push(Step::Install);

        if self.options.skip_reproduce {
            return Ok(PipelineOutcome::Completed(PipelineReport {
                toggle,
                steps,
                reproduction: None,
            }));
        }

        announce(Step::Reproduce);
        let reproduction = self
            .runner
            .reproduce(&self.layout.demo_dir, &self.layout.tool_command)?;
        steps.push(Step::Reproduce);

        Ok(PipelineOutcome::Completed(PipelineReport {
            toggle,
            steps,
            reproduction: Some(reproduction),
        }))
    }
}

fn announce(step: Step) {
    println!("\n{} {}", "▶".cyan().bold(), step.to_string().bold());
}
