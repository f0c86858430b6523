//! Error types for pkgref-toggle.
//!
//! All operations return `Result<T>` which aliases `Result<T, Error>`.
//! Manifest loading and saving failures are grouped under [`ManifestError`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading, mutating or persisting a project manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest file does not exist.
    #[error("Manifest not found: {0}")]
    NotFound(PathBuf),

    /// Manifest is not a well-formed project file.
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// `Version` property is not `major.minor.patch`.
    #[error("Invalid version '{version}': {source}")]
    InvalidVersion {
        version: String,
        source: semver::Error,
    },

    /// Patch number is already at its maximum.
    #[error("Cannot bump version '{0}': patch number would overflow")]
    VersionOverflow(String),

    /// Reading or writing the manifest failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors from toggle, pipeline and restore operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Invalid dependency name.
    #[error("Invalid dependency name '{0}': {1}")]
    InvalidName(String, String),

    /// A project file or directory the pipeline needs is missing.
    #[error("{1} not found: {0}")]
    MissingPath(PathBuf, &'static str),

    /// Zero or several candidate project files where exactly one is needed.
    #[error("Expected exactly one {kind} file in {dir}, found {found}")]
    AmbiguousProject {
        dir: PathBuf,
        kind: &'static str,
        found: usize,
    },

    /// External command could not be started.
    #[error("Failed to run '{program}': {source}")]
    CommandSpawn {
        program: String,
        source: std::io::Error,
    },

    /// External command exited unsuccessfully.
    #[error("Command '{command}' failed with {}", exit_description(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// Layout configuration file is invalid.
    #[error("Invalid configuration in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// File system operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Unexpected error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    }
}

/// Result type alias for pkgref-toggle operations.
pub type Result<T> = std::result::Result<T, Error>;
