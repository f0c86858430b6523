//! Validation rules for package identifiers.
//!
//! Pure functions with no I/O or side effects.

use crate::error::{Error, Result};

const MAX_PACKAGE_ID_LENGTH: usize = 100;

/// Validates a package id against NuGet rules.
///
/// ## Rules
/// - 1-100 ASCII characters
/// - Contains only `[a-zA-Z0-9._-]`
/// - Cannot start or end with `.`
/// - No consecutive `..`
///
/// ## Warnings (non-fatal)
/// - All lowercase (convention: `Company.Product`)
pub fn validate_dependency_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName(
            name.to_string(),
            "cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_PACKAGE_ID_LENGTH {
        return Err(Error::InvalidName(
            name.to_string(),
            format!(
                "exceeds {} chars (has {})",
                MAX_PACKAGE_ID_LENGTH,
                name.len()
            ),
        ));
    }

    for (idx, ch) in name.chars().enumerate() {
        if !ch.is_ascii() {
            return Err(Error::InvalidName(
                name.to_string(),
                format!("non-ASCII character '{}' at position {}", ch, idx),
            ));
        }

        if !ch.is_ascii_alphanumeric() && ch != '_' && ch != '-' && ch != '.' {
            return Err(Error::InvalidName(
                name.to_string(),
                format!("invalid character '{}' at position {}", ch, idx),
            ));
        }
    }

    if name.starts_with('.') || name.ends_with('.') {
        return Err(Error::InvalidName(
            name.to_string(),
            "cannot start or end with '.'".to_string(),
        ));
    }

    if name.contains("..") {
        return Err(Error::InvalidName(
            name.to_string(),
            "cannot contain '..'".to_string(),
        ));
    }

    if !name.chars().any(|c| c.is_ascii_uppercase()) {
        log::warn!("'{}' is all lowercase (convention: Company.Product)", name);
    }

    Ok(())
}
