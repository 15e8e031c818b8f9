//! Release artefact naming, retrieval, verification, and extraction.
//!
//! # Sub-modules
//!
//! - [`download`] - Archive fetch trait and HTTPS implementation.
//! - [`error`] - Semantic error types for artefact value validation.
//! - [`extraction`] - Executable extraction with path traversal protection.
//! - [`naming`] - Archive naming policy (`ArtefactName`, `BinaryName`).
//! - [`sha256_digest`] - SHA-256 digest newtype (`Sha256Digest`).
//! - [`verification`] - Checksum verification of downloaded bytes.

pub mod download;
pub mod error;
pub mod extraction;
pub mod naming;
pub mod sha256_digest;
pub mod verification;
