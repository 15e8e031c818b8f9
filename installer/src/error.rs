//! Error types for the azguard installer.
//!
//! Every step of the install sequence has its own variant so that the user
//! sees exactly which stage aborted the run. None of these are recovered
//! locally; the binary prints the message and exits non-zero.

use crate::artefact::download::DownloadError;
use crate::artefact::extraction::ExtractionError;
use crate::release::error::ReleaseError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while installing the azguard binary.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The running host is not one of the published platforms.
    #[error(
        "unsupported platform {os}/{arch}; prebuilt azguard binaries exist for \
         darwin and linux on arm64 and amd64"
    )]
    UnsupportedPlatform {
        /// Operating system name reported by the host.
        os: String,
        /// CPU architecture name reported by the host.
        arch: String,
    },

    /// The release table has no entry for the requested platform and version.
    #[error("no release artefact for {platform} at version {version}")]
    UnknownTarget {
        /// Platform key, e.g. `linux-amd64`.
        platform: String,
        /// Requested release version.
        version: String,
    },

    /// Fetching the release archive failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The downloaded bytes do not hash to the pinned digest.
    #[error("checksum mismatch for {url}: expected sha256 {expected}, got {actual}")]
    ChecksumMismatch {
        /// URL the archive was fetched from.
        url: String,
        /// Digest recorded in the release table.
        expected: String,
        /// Digest computed over the downloaded bytes.
        actual: String,
    },

    /// The archive could not be unpacked or did not hold exactly one executable.
    #[error("invalid release archive: {0}")]
    ArchiveFormat(#[from] ExtractionError),

    /// Writing the executable into the bin directory failed.
    #[error("filesystem error at {path}: {reason}")]
    Filesystem {
        /// Path being written, renamed, or removed.
        path: Utf8PathBuf,
        /// Description of the underlying I/O failure.
        reason: String,
    },

    /// The installed executable did not pass its `--version` smoke test.
    #[error("post-install verification of {path} failed: {reason}")]
    PostInstallVerification {
        /// Path of the executable under test.
        path: Utf8PathBuf,
        /// Why the smoke test failed.
        reason: String,
    },

    /// The release table could not be loaded or failed validation.
    #[error("release table error: {0}")]
    Config(#[from] ReleaseError),

    /// No bin directory was given and none could be derived for this user.
    #[error("could not determine a bin directory; pass --bin-dir or set AZGUARD_BIN_DIR")]
    BinDirUnresolved,

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

impl InstallerError {
    /// Build a [`InstallerError::Filesystem`] from a path and an I/O error.
    pub(crate) fn filesystem(path: impl Into<Utf8PathBuf>, err: &std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
