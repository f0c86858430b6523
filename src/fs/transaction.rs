//! Staged manifest rewrites with all-or-nothing commit.
//!
//! ## Execution Guarantees
//!
//! - **Atomicity**: every file is replaced via temp file + rename; if one
//!   write fails, files already written by this commit are restored
//! - **Validation**: pre-flight checks before any mutation
//! - **Idempotency**: files with unchanged content are skipped
//!
//! ## Phases
//!
//! 1. **Build**: Stage rewrites via `update_file()`
//! 2. **Validate**: Check paths exist, are writable, no duplicates
//! 3. **Execute**: Write files in staging order
//! 4. **Rollback** (on failure): Restore written files in LIFO order
//!
//! ## Example
//!
//! ```no_run
//! # use pkgref_toggle::fs::Transaction;
//! # use std::path::PathBuf;
//! # fn example() -> pkgref_toggle::error::Result<()> {
//! let mut txn = Transaction::new(false);
//!
//! let path = PathBuf::from("GlobalTool/_build.csproj");
//! let original = std::fs::read_to_string(&path)?;
//! let updated = original.replace("1.0.0", "1.0.1");
//! txn.update_file(path, original, updated)?;
//!
//! txn.commit()?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, ManifestError, Result};
use crate::fs::atomic::write_atomic;

use colored::Colorize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A staged file rewrite.
#[derive(Debug, Clone)]
struct FileUpdate {
    path: PathBuf,
    /// Content read when the update was staged, restored on rollback.
    original: String,
    new: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransactionState {
    /// Staging operations.
    Building,
    /// All operations succeeded.
    Committed,
    /// A write failed and earlier writes were restored.
    RolledBack,
    /// Validation or rollback failed.
    Failed,
}

/// Transaction coordinating manifest rewrites.
///
/// Must be explicitly committed. If dropped without committing, logs a warning
/// but doesn't roll back (since operations weren't applied).
///
/// ## Dry-Run Mode
///
/// When `dry_run = true`, operations are staged but never written.
#[must_use = "Transaction must be committed"]
pub struct Transaction {
    operations: Vec<FileUpdate>,
    dry_run: bool,
    state: TransactionState,
    executed: Vec<usize>,
}

impl Transaction {
    /// Creates a new transaction.
    pub fn new(dry_run: bool) -> Self {
        Self {
            operations: Vec::new(),
            dry_run,
            state: TransactionState::Building,
            executed: Vec::new(),
        }
    }

    /// Stages a file rewrite.
    ///
    /// `original` is what the caller read and based `new_content` on. If the
    /// two are identical the update is skipped.
    pub fn update_file(&mut self, path: PathBuf, original: String, new_content: String) -> Result<()> {
        if self.state != TransactionState::Building {
            return Err(Error::Other(anyhow::anyhow!(
                "Cannot modify transaction after commit"
            )));
        }

        if original == new_content {
            log::debug!("Content unchanged, skipping: {}", path.display());
            return Ok(());
        }

        if self.dry_run {
            log::info!("Would update: {}", path.display());
        } else {
            log::debug!("Staging update for: {}", path.display());
        }

        self.operations.push(FileUpdate {
            path,
            original,
            new: new_content,
        });
        Ok(())
    }

    /// Validates all staged operations.
    ///
    /// Checks:
    /// - No duplicate file operations
    /// - Files still exist
    /// - Files are writable
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for op in &self.operations {
            if !seen.insert(op.path.clone()) {
                return Err(Error::Other(anyhow::anyhow!(
                    "Duplicate file operation: {}",
                    op.path.display()
                )));
            }

            let metadata = fs::metadata(&op.path).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ManifestError::NotFound(op.path.clone()),
                _ => ManifestError::Io {
                    path: op.path.clone(),
                    source: e,
                },
            })?;

            if metadata.permissions().readonly() {
                return Err(ManifestError::Io {
                    path: op.path.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::PermissionDenied,
                        "file is read-only",
                    ),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Commits all staged operations.
    ///
    /// On a failed write, rolls back the writes already done.
    pub fn commit(&mut self) -> Result<()> {
        if self.state != TransactionState::Building {
            return Err(Error::Other(anyhow::anyhow!(
                "Transaction already committed"
            )));
        }

        if self.dry_run {
            self.state = TransactionState::Committed;
            return Ok(());
        }

        if let Err(e) = self.validate() {
            self.state = TransactionState::Failed;
            return Err(e);
        }

        for idx in 0..self.operations.len() {
            let op = &self.operations[idx];
            if let Err(source) = write_atomic(&op.path, op.new.as_bytes()) {
                let err = ManifestError::Io {
                    path: op.path.clone(),
                    source,
                };
                log::error!("{}", err);

                if let Err(rollback_err) = self.rollback() {
                    log::error!("{}", rollback_err);
                    self.state = TransactionState::Failed;
                }
                return Err(err.into());
            }
            self.executed.push(idx);
            log::debug!("Updated: {}", self.operations[idx].path.display());
        }

        self.state = TransactionState::Committed;
        Ok(())
    }

    /// Restores executed writes in LIFO order.
    fn rollback(&mut self) -> Result<()> {
        let mut errors = Vec::new();

        for &idx in self.executed.iter().rev() {
            let op = &self.operations[idx];
            if let Err(e) = write_atomic(&op.path, op.original.as_bytes()) {
                errors.push(format!("Failed to restore {}: {}", op.path.display(), e));
            }
        }

        if errors.is_empty() {
            self.state = TransactionState::RolledBack;
            log::info!("Rollback completed");
            Ok(())
        } else {
            Err(Error::Other(anyhow::anyhow!(
                "Rollback failed: {}",
                errors.join("; ")
            )))
        }
    }

    /// Prints the staged or applied files, relative to `root`.
    pub fn print_summary(&self, root: &Path) {
        if self.operations.is_empty() {
            println!("\n{}", "No changes needed".yellow());
            return;
        }

        if self.dry_run {
            println!("\n{}", "DRY RUN - No changes will be made".yellow().bold());
        } else {
            println!("\n{}", "Changes applied:".green().bold());
        }

        let mut paths: Vec<String> = self
            .operations
            .iter()
            .map(|op| {
                pathdiff::diff_paths(&op.path, root)
                    .unwrap_or_else(|| op.path.clone())
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        paths.sort();

        for path in &paths {
            if self.dry_run {
                println!("   • {}", path.dimmed());
            } else {
                println!("   {} {}", "✓".green(), path.dimmed());
            }
        }

        if self.dry_run {
            let num_ops = self.operations.len();
            println!(
                "\n{} {} will be modified. Run without {} to apply.",
                num_ops.to_string().cyan().bold(),
                if num_ops > 1 { "files" } else { "file" },
                "--dry-run".cyan()
            );
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.state == TransactionState::Building && !self.operations.is_empty() && !self.dry_run
        {
            log::warn!("Transaction dropped without commit");
        }
    }
}
