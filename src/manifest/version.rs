//! Project version bumping.

use crate::error::ManifestError;
use semver::Version;

/// Returns `major.minor.(patch + 1)` for a `major.minor.patch` string.
///
/// Prerelease and build metadata are dropped, so `1.2.3-beta.1` becomes
/// `1.2.4`.
pub fn bump_patch(raw: &str) -> Result<Version, ManifestError> {
    let current = Version::parse(raw.trim()).map_err(|source| ManifestError::InvalidVersion {
        version: raw.to_string(),
        source,
    })?;
    let patch = current
        .patch
        .checked_add(1)
        .ok_or_else(|| ManifestError::VersionOverflow(raw.to_string()))?;
    Ok(Version::new(current.major, current.minor, patch))
}
