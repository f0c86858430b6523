//! `dotnet` CLI implementation of the runner traits.

use super::{PackageRunner, Reproducer, Reproduction};
use crate::error::{Error, Result};

use regex::Regex;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::LazyLock;

static EXCEPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i:unhandled exception)|\b[A-Za-z_][\w.]*Exception\b").unwrap());

/// Runs commands through a `dotnet` executable.
#[derive(Debug, Clone)]
pub struct DotnetCli {
    program: PathBuf,
}

impl DotnetCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Logs the SDK version, or warns when the executable can't be run.
    pub fn check_available(&self) -> bool {
        match Command::new(&self.program).arg("--version").output() {
            Ok(output) if output.status.success() => {
                log::debug!(
                    "Using {} {}",
                    self.program.display(),
                    String::from_utf8_lossy(&output.stdout).trim()
                );
                true
            }
            Ok(output) => {
                log::warn!(
                    "{} --version failed: {}",
                    self.program.display(),
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                false
            }
            Err(e) => {
                log::warn!("Could not run {}: {}", self.program.display(), e);
                false
            }
        }
    }

    fn describe<I, S>(&self, args: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(
            args.into_iter()
                .map(|a| a.as_ref().to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }

    /// Runs with inherited stdio and fails on non-zero exit.
    fn run<I, S>(&self, args: I, working_dir: Option<&Path>) -> Result<()>
    where
        I: IntoIterator<Item = S> + Clone,
        S: AsRef<OsStr>,
    {
        let command = self.describe(args.clone());
        log::info!("Running: {}", command);

        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().map_err(|source| Error::CommandSpawn {
            program: self.program.to_string_lossy().into_owned(),
            source,
        })?;

        if !status.success() {
            return Err(Error::CommandFailed {
                command,
                code: status.code(),
            });
        }
        Ok(())
    }
}

impl PackageRunner for DotnetCli {
    fn restore(&self, project: &Path) -> Result<()> {
        self.run([OsStr::new("restore"), project.as_os_str()], None)
    }

    fn build(&self, project: &Path) -> Result<()> {
        self.restore(project)?;
        self.run([OsStr::new("pack"), project.as_os_str()], None)
    }

    fn install(&self, working_dir: &Path, tool_package: &str) -> Result<()> {
        self.run(["tool", "update", tool_package], Some(working_dir))?;
        self.run(["tool", "restore"], Some(working_dir))
    }
}

impl Reproducer for DotnetCli {
    fn reproduce(&self, working_dir: &Path, tool_command: &str) -> Result<Reproduction> {
        log::info!(
            "Running: {} in {}",
            self.describe([tool_command]),
            working_dir.display()
        );

        let output = Command::new(&self.program)
            .arg(tool_command)
            .current_dir(working_dir)
            .output()
            .map_err(|source| Error::CommandSpawn {
                program: self.program.to_string_lossy().into_owned(),
                source,
            })?;

        Ok(classify(&output))
    }
}

/// Decides whether a finished tool run showed a runtime exception.
fn classify(output: &Output) -> Reproduction {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    log::debug!("Tool stdout:\n{}", stdout);
    log::debug!("Tool stderr:\n{}", stderr);

    match detect_exception(&stderr).or_else(|| detect_exception(&stdout)) {
        Some(excerpt) => Reproduction::ExceptionObserved { excerpt },
        None if output.status.success() => Reproduction::Clean,
        None => Reproduction::ExceptionObserved {
            excerpt: stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .map(|l| l.trim().to_string())
                .unwrap_or_else(|| match output.status.code() {
                    Some(code) => format!("exited with code {}", code),
                    None => "terminated by signal".to_string(),
                }),
        },
    }
}

/// First line of `text` that reports an exception.
fn detect_exception(text: &str) -> Option<String> {
    text.lines()
        .find(|line| EXCEPTION_LINE.is_match(line))
        .map(|line| line.trim().to_string())
}
