//! Where the pipeline finds its projects.
//!
//! Values come from three layers, later ones winning:
//!
//! 1. built-in defaults relative to the root
//! 2. `pkgref-toggle.toml` in the root
//! 3. command-line flags

use crate::error::{Error, Result};

use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;

/// Name of the optional layout file in the root directory.
pub const CONFIG_FILE: &str = "pkgref-toggle.toml";

const DEFAULT_LIBRARY: &str = "InternalLibrary/InternalLibrary.csproj";
const DEFAULT_TOOL_PROJECT: &str = "GlobalTool/_build.csproj";
const DEFAULT_DEMO_DIR: &str = "Demonstration";
const DEFAULT_TOOL_PACKAGE: &str = "SampleNukeTool";
const DEFAULT_TOOL_COMMAND: &str = "sample-nuke-tool";
pub const DEFAULT_DEPENDENCY: &str = "Nuke.Common";

/// Layout values that may be set by the config file or on the command line.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutOverrides {
    /// Solution file gating the pipeline (defaults to the single *.sln in the root)
    #[arg(long, value_name = "PATH")]
    pub solution: Option<PathBuf>,

    /// Library project packed before the tool
    #[arg(long, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// Global tool project whose manifest is toggled
    #[arg(long, value_name = "PATH")]
    pub tool_project: Option<PathBuf>,

    /// Directory with the tool manifest where the tool is installed and run
    #[arg(long, value_name = "DIR")]
    pub demo_dir: Option<PathBuf>,

    /// Package id of the global tool
    #[arg(long, value_name = "ID")]
    pub tool_package: Option<String>,

    /// Command name the installed tool is invoked with
    #[arg(long, value_name = "NAME")]
    pub tool_command: Option<String>,

    /// Package reference to add or remove
    #[arg(long, value_name = "ID")]
    pub dependency: Option<String>,
}

impl LayoutOverrides {
    /// Fills every unset value from `fallback`.
    pub fn or(self, fallback: LayoutOverrides) -> Self {
        Self {
            solution: self.solution.or(fallback.solution),
            library: self.library.or(fallback.library),
            tool_project: self.tool_project.or(fallback.tool_project),
            demo_dir: self.demo_dir.or(fallback.demo_dir),
            tool_package: self.tool_package.or(fallback.tool_package),
            tool_command: self.tool_command.or(fallback.tool_command),
            dependency: self.dependency.or(fallback.dependency),
        }
    }

    /// Reads `pkgref-toggle.toml` from `root`, or nothing if it doesn't exist.
    pub fn from_config(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        log::debug!("Reading layout from {}", path.display());
        let content = fs::read_to_string(&path)?;
        let doc: DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| Error::Config {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let string = |key: &str| -> Result<Option<String>> {
            match doc.get(key) {
                None => Ok(None),
                Some(item) => item.as_str().map(|s| Some(s.to_string())).ok_or_else(|| {
                    Error::Config {
                        path: path.clone(),
                        reason: format!("'{}' must be a string", key),
                    }
                }),
            }
        };

        const KNOWN: &[&str] = &[
            "solution",
            "library",
            "tool-project",
            "demo-dir",
            "tool-package",
            "tool-command",
            "dependency",
        ];
        for (key, _) in doc.iter() {
            if !KNOWN.contains(&key) {
                log::warn!("Unknown key '{}' in {}", key, path.display());
            }
        }

        Ok(Self {
            solution: string("solution")?.map(PathBuf::from),
            library: string("library")?.map(PathBuf::from),
            tool_project: string("tool-project")?.map(PathBuf::from),
            demo_dir: string("demo-dir")?.map(PathBuf::from),
            tool_package: string("tool-package")?,
            tool_command: string("tool-command")?,
            dependency: string("dependency")?,
        })
    }
}

/// Resolved pipeline layout with absolute-or-root-relative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    /// `None` when the root holds no solution; the pipeline is skipped then.
    pub solution: Option<PathBuf>,
    pub library_project: PathBuf,
    pub tool_project: PathBuf,
    pub demo_dir: PathBuf,
    pub tool_package: String,
    pub tool_command: String,
    pub dependency: String,
}

impl Layout {
    /// Resolves the layout for `root`, applying config file and `overrides`.
    pub fn resolve(root: &Path, overrides: LayoutOverrides) -> Result<Self> {
        let values = overrides.or(LayoutOverrides::from_config(root)?);
        let at_root = |p: PathBuf| if p.is_absolute() { p } else { root.join(p) };

        let solution = match values.solution {
            Some(path) => Some(at_root(path)),
            None => {
                let mut found = find_files(root, "sln")?;
                match found.len() {
                    0 | 1 => found.pop(),
                    n => {
                        return Err(Error::AmbiguousProject {
                            dir: root.to_path_buf(),
                            kind: "sln",
                            found: n,
                        });
                    }
                }
            }
        };

        Ok(Self {
            root: root.to_path_buf(),
            solution,
            library_project: at_root(values.library.unwrap_or_else(|| DEFAULT_LIBRARY.into())),
            tool_project: at_root(
                values
                    .tool_project
                    .unwrap_or_else(|| DEFAULT_TOOL_PROJECT.into()),
            ),
            demo_dir: at_root(values.demo_dir.unwrap_or_else(|| DEFAULT_DEMO_DIR.into())),
            tool_package: values
                .tool_package
                .unwrap_or_else(|| DEFAULT_TOOL_PACKAGE.to_string()),
            tool_command: values
                .tool_command
                .unwrap_or_else(|| DEFAULT_TOOL_COMMAND.to_string()),
            dependency: values
                .dependency
                .unwrap_or_else(|| DEFAULT_DEPENDENCY.to_string()),
        })
    }

    /// Whether the solution gating the pipeline is present.
    pub fn has_solution(&self) -> bool {
        self.solution.as_ref().is_some_and(|s| s.is_file())
    }
}

/// Files in `dir` (not recursive) with the given extension, sorted.
pub fn find_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// The single file with `extension` in `dir`.
pub fn find_single(dir: &Path, extension: &'static str) -> Result<PathBuf> {
    let mut files = find_files(dir, extension)?;
    if files.len() != 1 {
        return Err(Error::AmbiguousProject {
            dir: dir.to_path_buf(),
            kind: extension,
            found: files.len(),
        });
    }
    Ok(files.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let temp = TempDir::new().unwrap();
        let layout = Layout::resolve(temp.path(), LayoutOverrides::default()).unwrap();

        assert_eq!(layout.solution, None);
        assert_eq!(
            layout.tool_project,
            temp.path().join("GlobalTool/_build.csproj")
        );
        assert_eq!(
            layout.library_project,
            temp.path().join("InternalLibrary/InternalLibrary.csproj")
        );
        assert_eq!(layout.demo_dir, temp.path().join("Demonstration"));
        assert_eq!(layout.tool_package, "SampleNukeTool");
        assert_eq!(layout.tool_command, "sample-nuke-tool");
        assert_eq!(layout.dependency, "Nuke.Common");
    }

    #[test]
    fn test_solution_discovered_in_root() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Sample.sln"), "").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();

        let layout = Layout::resolve(temp.path(), LayoutOverrides::default()).unwrap();
        assert_eq!(layout.solution, Some(temp.path().join("Sample.sln")));
    }

    #[test]
    fn test_several_solutions_need_explicit_choice() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("A.sln"), "").unwrap();
        fs::write(temp.path().join("B.sln"), "").unwrap();

        let err = Layout::resolve(temp.path(), LayoutOverrides::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::AmbiguousProject {
                kind: "sln",
                found: 2,
                ..
            }
        ));

        let layout = Layout::resolve(
            temp.path(),
            LayoutOverrides {
                solution: Some("B.sln".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(layout.solution, Some(temp.path().join("B.sln")));
    }

    #[test]
    fn test_config_file_then_flags() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            r#"
# layout for the sample
tool-project = "tools/Tool.csproj"
dependency = "Foo.Bar"
tool-command = "from-config"
"#,
        )
        .unwrap();

        let flags = LayoutOverrides {
            tool_command: Some("from-flag".into()),
            ..Default::default()
        };
        let layout = Layout::resolve(temp.path(), flags).unwrap();

        assert_eq!(layout.tool_project, temp.path().join("tools/Tool.csproj"));
        assert_eq!(layout.dependency, "Foo.Bar");
        assert_eq!(layout.tool_command, "from-flag");
        assert_eq!(layout.tool_package, "SampleNukeTool");
    }

    #[test]
    fn test_config_rejects_non_strings() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "dependency = 3\n").unwrap();

        let err = Layout::resolve(temp.path(), LayoutOverrides::default()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("'dependency' must be a string"));
    }

    #[test]
    fn test_config_rejects_invalid_toml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "dependency = \n").unwrap();

        let err = Layout::resolve(temp.path(), LayoutOverrides::default()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_find_single() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            find_single(temp.path(), "csproj"),
            Err(Error::AmbiguousProject { found: 0, .. })
        ));

        fs::write(temp.path().join("A.csproj"), "").unwrap();
        assert_eq!(
            find_single(temp.path(), "csproj").unwrap(),
            temp.path().join("A.csproj")
        );

        fs::write(temp.path().join("B.csproj"), "").unwrap();
        assert!(matches!(
            find_single(temp.path(), "csproj"),
            Err(Error::AmbiguousProject { found: 2, .. })
        ));
    }
}
