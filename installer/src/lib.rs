//! azguard installer library.
//!
//! This crate downloads the prebuilt `azguard` binary for the running host,
//! verifies it against a pinned SHA-256 digest, places it in a bin directory
//! and smoke-tests it. It is used by the `azguard-installer` CLI binary and
//! can be consumed programmatically for testing or custom install flows.
//!
//! # Modules
//!
//! - [`artefact`] - Archive naming, download, verification, and extraction
//! - [`cli`] - Command-line argument definitions
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Error types for each install step
//! - [`output`] - Progress, success, and dry-run formatting
//! - [`pin`] - Release table pinning from checksums files
//! - [`pipeline`] - Install pipeline orchestration
//! - [`placement`] - Atomic placement with rollback
//! - [`platform`] - Host platform detection
//! - [`release`] - Release table loading and target resolution
//! - [`self_test`] - Post-install `--version` smoke test
//! - [`targets`] - Release table listing

pub mod artefact;
pub mod cli;
pub mod dirs;
pub mod error;
pub mod output;
pub mod pin;
pub mod pipeline;
pub mod placement;
pub mod platform;
pub mod release;
pub mod self_test;
pub mod targets;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
