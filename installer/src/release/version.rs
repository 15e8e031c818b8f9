//! Release version newtype.
//!
//! Versions are dotted numeric triples or shorter (`1`, `1.0`, `1.0.0`),
//! optionally followed by a `-` pre-release suffix of ASCII alphanumerics
//! and dots. A leading `v` (the release tag spelling) is stripped.

use super::error::ReleaseError;
use std::fmt;

/// A validated release version without the `v` tag prefix.
///
/// # Examples
///
/// ```
/// use azguard_installer::release::version::ReleaseVersion;
///
/// let version = ReleaseVersion::try_from("v1.0.0").expect("valid version");
/// assert_eq!(version.as_str(), "1.0.0");
/// assert_eq!(version.tag(), "v1.0.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    /// Return the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the release tag, i.e. the version prefixed with `v`.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("v{}", self.0)
    }
}

impl TryFrom<&str> for ReleaseVersion {
    type Error = ReleaseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
        validate_version(bare).map_err(|reason| ReleaseError::InvalidVersion {
            value: value.to_owned(),
            reason: reason.to_owned(),
        })?;
        Ok(Self(bare.to_owned()))
    }
}

impl TryFrom<String> for ReleaseVersion {
    type Error = ReleaseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_version(value: &str) -> Result<(), &'static str> {
    let (core, pre) = match value.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (value, None),
    };
    if core.is_empty() {
        return Err("version is empty");
    }
    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() > 3 {
        return Err("expected at most three numeric components");
    }
    if parts
        .iter()
        .any(|part| part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()))
    {
        return Err("numeric components must be non-empty digits");
    }
    if let Some(pre) = pre {
        if pre.is_empty() || !pre.chars().all(|c| c.is_ascii_alphanumeric() || c == '.') {
            return Err("pre-release suffix must be ASCII alphanumerics and dots");
        }
    }
    Ok(())
}
