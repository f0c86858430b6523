//! Write-to-temp-then-rename file replacement.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Replaces the contents of `path` without ever leaving a truncated file.
///
/// The new content goes to a hidden sibling file which is synced and then
/// renamed over `path`. Permissions of an existing file are carried over.
/// On error the temp file is removed and `path` is untouched.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let temp_path = temp_path_for(path);

    let result = (|| {
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        temp_file.write_all(content)?;
        temp_file.sync_all()?;

        if let Ok(metadata) = fs::metadata(path) {
            fs::set_permissions(&temp_path, metadata.permissions())?;
        }

        fs::rename(&temp_path, path)
    })();

    if result.is_err() && temp_path.exists() {
        if let Err(e) = fs::remove_file(&temp_path) {
            log::warn!("Could not remove {}: {}", temp_path.display(), e);
        }
    }
    result
}

/// Temp file in the same directory, so the rename stays on one filesystem.
fn temp_path_for(path: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    path.with_file_name(temp_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_replaces_content_and_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Tool.csproj");
        fs::write(&file, "old").unwrap();

        write_atomic(&file, b"new").unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "new");
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_missing_parent_fails_without_side_effects() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("missing").join("Tool.csproj");

        assert!(write_atomic(&file, b"new").is_err());
        assert!(!file.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Tool.csproj");
        fs::write(&file, "old").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o640)).unwrap();

        write_atomic(&file, b"new").unwrap();

        let mode = fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }
}
