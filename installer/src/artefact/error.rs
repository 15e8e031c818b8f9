//! Error types for artefact values such as checksums and names.
//!
//! Each variant identifies the rejected input and the constraint it broke.

use thiserror::Error;

/// Errors arising from invalid artefact-related values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtefactError {
    /// A SHA-256 digest is not a valid 64-character hex string.
    #[error("invalid SHA-256 digest: {reason}")]
    InvalidSha256Digest {
        /// Description of the validation failure.
        reason: String,
    },

    /// A checksum is an unfilled template value rather than a published digest.
    #[error("placeholder checksum \"{value}\" is not a published SHA-256 digest")]
    PlaceholderDigest {
        /// The rejected value.
        value: String,
    },

    /// An executable name cannot be used as a single file name.
    #[error("invalid binary name \"{value}\": {reason}")]
    InvalidBinaryName {
        /// The rejected name.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },
}

/// Result type alias using [`ArtefactError`].
pub type Result<T> = std::result::Result<T, ArtefactError>;
