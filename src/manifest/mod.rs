//! Typed project manifest and the operations that mutate it.
//!
//! The on-disk text is only handled by [`codec`]; everything else works on
//! [`ProjectManifest`].

pub mod codec;
pub mod toggle;
pub mod version;

pub use toggle::{ReferenceChange, ToggleReport, apply, plan_toggle, toggle};

use clap::ValueEnum;
use std::fmt;

/// Version constraint given to references added by the toggler.
pub const WILDCARD_VERSION: &str = "*";

/// Desired end state of a dependency reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// The reference is present.
    #[value(alias = "working")]
    Enabled,
    /// The reference is absent.
    #[value(alias = "not-working")]
    Disabled,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Enabled => write!(f, "enabled"),
            Mode::Disabled => write!(f, "disabled"),
        }
    }
}

/// A `PackageReference` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReference {
    pub name: String,
    /// `None` when the version is managed centrally.
    pub version: Option<String>,
}

impl DependencyReference {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// A reference that floats to the latest available version.
    pub fn wildcard(name: impl Into<String>) -> Self {
        Self::new(name, Some(WILDCARD_VERSION.to_string()))
    }
}

/// The parts of a project file the toggler reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectManifest {
    pub version: String,
    pub references: Vec<DependencyReference>,
}

impl ProjectManifest {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            references: Vec::new(),
        }
    }

    /// First reference whose name equals `name` exactly.
    pub fn find_reference(&self, name: &str) -> Option<&DependencyReference> {
        self.references.iter().find(|r| r.name == name)
    }

    /// Removes and returns the first reference named `name`.
    pub fn remove_reference(&mut self, name: &str) -> Option<DependencyReference> {
        let idx = self.references.iter().position(|r| r.name == name)?;
        Some(self.references.remove(idx))
    }
}
