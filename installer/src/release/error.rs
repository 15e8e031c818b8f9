//! Error types for loading, validating, and pinning release tables.

use crate::artefact::error::ArtefactError;
use crate::platform::PlatformKeyError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising from release table configuration.
///
/// All of these are raised while the table is loaded, before any network
/// access takes place.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// A release version string is malformed.
    #[error("invalid release version \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected version string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The table file could not be read.
    #[error("failed to read release table {path}")]
    Read {
        /// Path of the table file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The table is not valid TOML or does not match the schema.
    #[error("could not parse release table from {origin}: {reason}")]
    Parse {
        /// Where the table came from (a path or `built-in`).
        origin: String,
        /// The parser's description of the failure.
        reason: String,
    },

    /// A target entry carries an unusable checksum.
    #[error("invalid release entry {key}: {source}")]
    InvalidEntry {
        /// The platform key of the entry.
        key: String,
        /// The validation failure.
        #[source]
        source: ArtefactError,
    },

    /// A target key is not a supported `<os>-<arch>` pair.
    #[error(transparent)]
    UnsupportedPlatformKey(#[from] PlatformKeyError),

    /// A download URL does not use HTTPS.
    #[error("release entry {key} uses a non-HTTPS URL: {url}")]
    InsecureUrl {
        /// The platform key of the entry.
        key: String,
        /// The rejected URL.
        url: String,
    },

    /// The binary name is unusable.
    #[error(transparent)]
    Artefact(#[from] ArtefactError),

    /// The table lists no targets at all.
    #[error("release table lists no targets")]
    EmptyTable,

    /// A line of a checksums file could not be parsed.
    #[error("invalid checksums file line {line}: {reason}")]
    Checksums {
        /// One-based line number.
        line: usize,
        /// Description of the parse failure.
        reason: String,
    },

    /// A checksums file lists no archive for any supported platform.
    #[error("checksums file lists no {binary} archives for version {version}")]
    NoPinnedTargets {
        /// Binary name the archives were expected for.
        binary: String,
        /// Version the archives were expected for.
        version: String,
    },

    /// The table could not be rendered as TOML.
    #[error("could not serialize release table: {reason}")]
    Serialize {
        /// The serializer's description of the failure.
        reason: String,
    },

    /// The pinned table could not be written.
    #[error("failed to write release table {path}")]
    Write {
        /// Destination path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
