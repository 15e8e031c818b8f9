//! SHA-256 digest newtype for artefact verification.
//!
//! Validates that the value is a 64-character hexadecimal string and that it
//! is not an unfilled template marker. Uppercase input is normalised to
//! lowercase so that comparisons are plain string equality.

use super::error::{ArtefactError, Result};
use sha2::{Digest, Sha256};
use std::fmt;

/// Expected length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// Fragments that mark a checksum as not yet filled in.
const PLACEHOLDER_MARKERS: &[&str] = &["REPLACE", "TODO", "PLACEHOLDER", "CHANGEME", "FIXME"];

/// A validated hex-encoded SHA-256 digest string.
///
/// # Examples
///
/// ```
/// use azguard_installer::artefact::sha256_digest::Sha256Digest;
///
/// let hex = "ab".repeat(32);
/// let digest: Sha256Digest = hex.as_str().try_into().unwrap();
/// assert_eq!(digest.as_str().len(), 64);
///
/// assert!(Sha256Digest::try_from("REPLACE_WITH_ACTUAL_SHA256").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Compute the digest of `bytes`.
    ///
    /// # Examples
    ///
    /// ```
    /// use azguard_installer::artefact::sha256_digest::Sha256Digest;
    ///
    /// let digest = Sha256Digest::of(b"");
    /// assert_eq!(
    ///     digest.as_str(),
    ///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    /// );
    /// ```
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for Sha256Digest {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        validate_sha256(value)?;
        Ok(Self(value.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Return whether `value` looks like an unfilled template rather than a digest.
///
/// Empty values, known marker words and the all-zero digest all count.
#[must_use]
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return true;
    }
    let upper = trimmed.to_ascii_uppercase();
    if PLACEHOLDER_MARKERS
        .iter()
        .any(|marker| upper.contains(marker))
    {
        return true;
    }
    trimmed.len() == DIGEST_HEX_LEN && trimmed.chars().all(|c| c == '0')
}

/// Validate that `value` is a well-formed, filled-in SHA-256 digest.
fn validate_sha256(value: &str) -> Result<()> {
    if is_placeholder(value) {
        return Err(ArtefactError::PlaceholderDigest {
            value: value.to_owned(),
        });
    }
    if value.len() != DIGEST_HEX_LEN {
        return Err(ArtefactError::InvalidSha256Digest {
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ArtefactError::InvalidSha256Digest {
            reason: format!("non-hex character '{bad}'"),
        });
    }
    Ok(())
}
