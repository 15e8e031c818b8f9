//! Shared test utilities for the installer crate.
//!
//! Builders for release archives and tables, plus test doubles for the
//! fetcher and platform detector traits.

use crate::artefact::download::{ArtefactFetcher, DownloadError};
use crate::artefact::sha256_digest::Sha256Digest;
use crate::error::Result;
use crate::platform::{Platform, PlatformDetector};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::cell::RefCell;
use std::collections::VecDeque;

/// One entry of a fabricated tar archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    path: String,
    contents: Vec<u8>,
    mode: u32,
    entry_type: tar::EntryType,
}

impl ArchiveEntry {
    /// A regular, non-executable file.
    #[must_use]
    pub fn file(path: &str, contents: &[u8]) -> Self {
        Self {
            path: path.to_owned(),
            contents: contents.to_vec(),
            mode: 0o644,
            entry_type: tar::EntryType::Regular,
        }
    }

    /// A regular file with mode `0o755`.
    #[must_use]
    pub fn executable(path: &str, contents: &[u8]) -> Self {
        Self {
            mode: 0o755,
            ..Self::file(path, contents)
        }
    }

    /// A directory entry.
    #[must_use]
    pub fn directory(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            contents: Vec::new(),
            mode: 0o755,
            entry_type: tar::EntryType::Directory,
        }
    }
}

/// Build a gzip-compressed tar archive in memory.
///
/// # Panics
///
/// Panics if writing to the in-memory buffer fails.
#[must_use]
pub fn tar_gz_archive(entries: &[ArchiveEntry]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for entry in entries {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(entry.entry_type);
        header.set_mode(entry.mode);
        header.set_size(entry.contents.len() as u64);
        builder
            .append_data(&mut header, &entry.path, entry.contents.as_slice())
            .expect("append archive entry");
    }
    builder
        .into_inner()
        .and_then(GzEncoder::finish)
        .expect("finish archive")
}

/// A release archive laid out like the published ones: documentation beside
/// a single `azguard` executable.
#[must_use]
pub fn release_archive(executable: &[u8]) -> Vec<u8> {
    tar_gz_archive(&[
        ArchiveEntry::file("README.md", b"# AzGuard\n"),
        ArchiveEntry::file("LICENSE", b"MIT License\n"),
        ArchiveEntry::executable("azguard", executable),
    ])
}

/// A shell script that answers `--version` like the real binary.
#[must_use]
pub fn fake_executable_script(version: &str) -> Vec<u8> {
    format!("#!/bin/sh\necho \"azguard version {version}\"\n").into_bytes()
}

/// A shell script whose `--version` fails.
#[must_use]
pub fn failing_executable_script() -> Vec<u8> {
    b"#!/bin/sh\necho \"broken install\" >&2\nexit 3\n".to_vec()
}

/// Hex SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256Digest::of(bytes).into_inner()
}

/// Render a release table with the default binary name and base URL.
///
/// `entries` pairs a platform key with its `sha256` value, which is written
/// verbatim so that invalid values can be exercised.
#[must_use]
pub fn release_table_toml(version: &str, entries: &[(&str, &str)]) -> String {
    let mut text = format!("version = \"{version}\"\n");
    if entries.is_empty() {
        text.push_str("\n[targets]\n");
    }
    let targets: String = entries
        .iter()
        .map(|(key, sha256)| format!("\n[targets.{key}]\nsha256 = \"{sha256}\"\n"))
        .collect();
    text + &targets
}

/// An [`ArtefactFetcher`] that replays canned responses in order.
#[derive(Debug, Default)]
pub struct StubFetcher {
    responses: RefCell<VecDeque<std::result::Result<Vec<u8>, DownloadError>>>,
    requested: RefCell<Vec<String>>,
}

impl StubFetcher {
    /// A fetcher that returns `bytes` once.
    #[must_use]
    pub fn serving(bytes: Vec<u8>) -> Self {
        Self::new(vec![Ok(bytes)])
    }

    /// A fetcher that fails once with `error`.
    #[must_use]
    pub fn failing(error: DownloadError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// A fetcher that replays `responses` in order.
    #[must_use]
    pub fn new(responses: Vec<std::result::Result<Vec<u8>, DownloadError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requested: RefCell::new(Vec::new()),
        }
    }

    /// URLs requested so far.
    #[must_use]
    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }

    /// How many fetches were made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requested.borrow().len()
    }
}

impl ArtefactFetcher for StubFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, DownloadError> {
        self.requested.borrow_mut().push(url.to_owned());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| {
                Err(DownloadError::HttpError {
                    url: url.to_owned(),
                    reason: "no canned response left".to_owned(),
                })
            })
    }
}

/// A [`PlatformDetector`] that reports fixed host names.
#[derive(Debug, Clone)]
pub struct FixedPlatform {
    os: String,
    arch: String,
}

impl FixedPlatform {
    /// Report `os`/`arch` as if read from the host, e.g. `linux`/`x86_64`.
    #[must_use]
    pub fn new(os: &str, arch: &str) -> Self {
        Self {
            os: os.to_owned(),
            arch: arch.to_owned(),
        }
    }
}

impl PlatformDetector for FixedPlatform {
    fn detect(&self) -> Result<Platform> {
        Platform::from_host_names(&self.os, &self.arch)
    }
}
