//! Integrity check for downloaded archives.
//!
//! The digest is not a secret, so a plain comparison is used. A mismatch is
//! always fatal: nothing downstream of [`verify`] runs on unverified bytes.

use super::sha256_digest::Sha256Digest;
use crate::error::{InstallerError, Result};
use log::debug;

/// Check `bytes` against `expected` and hand them back on success.
///
/// `url` only appears in the error message.
///
/// # Errors
///
/// Returns [`InstallerError::ChecksumMismatch`] when the SHA-256 of `bytes`
/// differs from `expected`.
///
/// # Examples
///
/// ```
/// use azguard_installer::artefact::sha256_digest::Sha256Digest;
/// use azguard_installer::artefact::verification::verify;
///
/// let expected = Sha256Digest::of(b"archive");
/// let bytes = verify(b"archive".to_vec(), &expected, "https://example.test/a.tar.gz")
///     .expect("digest matches");
/// assert_eq!(bytes, b"archive");
/// ```
pub fn verify(bytes: Vec<u8>, expected: &Sha256Digest, url: &str) -> Result<Vec<u8>> {
    let actual = Sha256Digest::of(&bytes);
    if actual != *expected {
        return Err(InstallerError::ChecksumMismatch {
            url: url.to_owned(),
            expected: expected.to_string(),
            actual: actual.into_inner(),
        });
    }
    debug!("sha256 {actual} verified for {url}");
    Ok(bytes)
}
