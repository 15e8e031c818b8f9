//! Executable extraction from `.tar.gz` release archives.
//!
//! Release archives carry the executable alongside documentation such as
//! `README.md` and `LICENSE`. Only regular files whose name equals the binary
//! name are candidates, and exactly one must be present. Entry paths are
//! validated against traversal before anything is read.

use flate2::read::GzDecoder;
use log::trace;
use std::io::Read;
use std::path::{Component, Path};

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The archive could not be decompressed or parsed.
    #[error("malformed archive: {0}")]
    Malformed(#[from] std::io::Error),

    /// A path in the archive attempts to traverse outside the archive root.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// No regular file named after the binary was found.
    #[error("archive does not contain an executable named {binary}")]
    MissingExecutable {
        /// The expected executable name.
        binary: String,
    },

    /// More than one regular file is named after the binary.
    #[error("archive contains {count} entries named {binary}; expected exactly one")]
    AmbiguousExecutable {
        /// The expected executable name.
        binary: String,
        /// How many candidates were found.
        count: usize,
    },
}

/// Unpack `archive` (gzip-compressed tar) and return the executable's bytes.
///
/// # Errors
///
/// Returns [`ExtractionError::Malformed`] if the archive cannot be read,
/// [`ExtractionError::PathTraversal`] if any entry escapes the archive root,
/// and [`ExtractionError::MissingExecutable`] or
/// [`ExtractionError::AmbiguousExecutable`] unless exactly one candidate
/// exists.
pub fn extract(archive: &[u8], binary_name: &str) -> Result<Vec<u8>, ExtractionError> {
    let mut tar = tar::Archive::new(GzDecoder::new(archive));
    let mut candidates: Vec<Vec<u8>> = Vec::new();

    for entry_result in tar.entries()? {
        let mut entry = entry_result?;
        let entry_path = entry.path()?.into_owned();
        validate_entry_path(&entry_path)?;
        trace!("archive entry {}", entry_path.display());

        if !entry.header().entry_type().is_file() || !is_named(&entry_path, binary_name) {
            continue;
        }

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        candidates.push(bytes);
    }

    let count = candidates.len();
    match candidates.pop() {
        Some(bytes) if count == 1 => Ok(bytes),
        Some(_) => Err(ExtractionError::AmbiguousExecutable {
            binary: binary_name.to_owned(),
            count,
        }),
        None => Err(ExtractionError::MissingExecutable {
            binary: binary_name.to_owned(),
        }),
    }
}

/// Whether the final component of `path` is exactly `binary_name`.
fn is_named(path: &Path, binary_name: &str) -> bool {
    path.file_name()
        .is_some_and(|name| name == std::ffi::OsStr::new(binary_name))
}

/// Validate that a tar entry path does not escape the archive root via `..`
/// components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    let escapes = path.is_absolute()
        || path
            .components()
            .any(|component| matches!(component, Component::ParentDir | Component::RootDir));
    if escapes {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}
