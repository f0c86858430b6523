//! Version bump plus conditional add/remove of a package reference.

use super::{DependencyReference, Mode, ProjectManifest, codec, version};
use crate::error::{ManifestError, Result};
use crate::fs::Transaction;

use colored::Colorize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to the reference set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceChange {
    Added,
    Removed,
    /// Already in the requested state.
    Unchanged,
}

/// Outcome of one toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleReport {
    pub path: PathBuf,
    pub dependency: String,
    pub mode: Mode,
    pub previous_version: String,
    pub new_version: String,
    pub change: ReferenceChange,
}

impl fmt::Display for ToggleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} → {}",
            "Version:".bold(),
            self.previous_version.yellow(),
            self.new_version.green().bold()
        )?;
        let change = match self.change {
            ReferenceChange::Added => "added".green(),
            ReferenceChange::Removed => "removed".red(),
            ReferenceChange::Unchanged => "unchanged".dimmed(),
        };
        write!(
            f,
            "{} {} ({}, {})",
            "Reference:".bold(),
            self.dependency.cyan(),
            self.mode,
            change
        )
    }
}

/// Bumps the patch version and brings `dependency` into the state `mode` asks for.
///
/// Enabling never overwrites an existing reference's constraint; disabling
/// removes the first reference with that exact name.
pub fn apply(
    manifest: &mut ProjectManifest,
    dependency: &str,
    mode: Mode,
) -> std::result::Result<(String, ReferenceChange), ManifestError> {
    let next = version::bump_patch(&manifest.version)?;
    manifest.version = next.to_string();

    let change = match mode {
        Mode::Disabled => match manifest.remove_reference(dependency) {
            Some(_) => ReferenceChange::Removed,
            None => ReferenceChange::Unchanged,
        },
        Mode::Enabled => match manifest.find_reference(dependency) {
            Some(_) => ReferenceChange::Unchanged,
            None => {
                manifest
                    .references
                    .push(DependencyReference::wildcard(dependency));
                ReferenceChange::Added
            }
        },
    };

    Ok((manifest.version.clone(), change))
}

/// Loads `path`, applies the toggle and stages the rewrite in `txn`.
pub fn plan_toggle(
    path: &Path,
    dependency: &str,
    mode: Mode,
    txn: &mut Transaction,
) -> Result<ToggleReport> {
    let source = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ManifestError::NotFound(path.to_path_buf()),
        _ => ManifestError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let parse_failure = |reason: String| ManifestError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    let mut manifest = codec::decode(&source).map_err(parse_failure)?;
    let previous_version = manifest.version.clone();
    let (new_version, change) = apply(&mut manifest, dependency, mode)?;
    let updated = codec::encode(&source, &manifest).map_err(parse_failure)?;

    log::debug!(
        "{}: version {} → {}, {} {:?}",
        path.display(),
        previous_version,
        new_version,
        dependency,
        change
    );

    txn.update_file(path.to_path_buf(), source, updated)?;

    Ok(ToggleReport {
        path: path.to_path_buf(),
        dependency: dependency.to_string(),
        mode,
        previous_version,
        new_version,
        change,
    })
}

/// Toggles `dependency` in the manifest at `path` and saves it in place.
pub fn toggle(path: &Path, dependency: &str, mode: Mode) -> Result<ToggleReport> {
    let mut txn = Transaction::new(false);
    let report = plan_toggle(path, dependency, mode, &mut txn)?;
    txn.commit()?;
    Ok(report)
}
