//! Published checksums files and release table pinning.
//!
//! Release pipelines publish a `<binary>_<version>_checksums.txt` file next
//! to the archives, one `<hex>  <filename>` pair per line (the `sha256sum`
//! layout, optionally with a `*` binary-mode marker before the filename).
//! Pinning looks up the archive name of every supported platform in that
//! file and turns the matches into a [`ReleaseTable`].

use super::error::ReleaseError;
use super::table::ReleaseTable;
use super::version::ReleaseVersion;
use crate::artefact::naming::{ArtefactName, BinaryName};
use crate::artefact::sha256_digest::Sha256Digest;
use crate::platform::Platform;
use log::debug;
use std::collections::BTreeMap;

/// Parsed contents of a checksums file, keyed by filename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumsFile {
    digests: BTreeMap<String, Sha256Digest>,
}

impl ChecksumsFile {
    /// Parse checksums text. Blank lines and `#` comments are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::Checksums`] naming the first malformed line,
    /// or the first line that repeats a filename with a different digest.
    ///
    /// # Examples
    ///
    /// ```
    /// use azguard_installer::release::checksums::ChecksumsFile;
    ///
    /// let digest = "ab".repeat(32);
    /// let text = format!("{digest}  azguard_1.0.0_linux_amd64.tar.gz\n");
    /// let file = ChecksumsFile::parse(&text).expect("valid checksums");
    /// assert!(file.digest_for("azguard_1.0.0_linux_amd64.tar.gz").is_some());
    /// ```
    pub fn parse(text: &str) -> Result<Self, ReleaseError> {
        let mut digests = BTreeMap::new();
        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let malformed = |reason: String| ReleaseError::Checksums {
                line: index + 1,
                reason,
            };
            let (digest, filename) = parse_line(line).map_err(malformed)?;
            match digests.get(&filename) {
                Some(existing) if *existing != digest => {
                    return Err(malformed(format!(
                        "{filename} is listed again with a different digest"
                    )));
                }
                Some(_) => {}
                None => {
                    digests.insert(filename, digest);
                }
            }
        }
        Ok(Self { digests })
    }

    /// Digest recorded for `filename`, if any.
    #[must_use]
    pub fn digest_for(&self, filename: &str) -> Option<&Sha256Digest> {
        self.digests.get(filename)
    }

    /// Number of entries in the file.
    #[must_use]
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    /// Whether the file lists no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}

fn parse_line(line: &str) -> Result<(Sha256Digest, String), String> {
    let mut fields = line.split_whitespace();
    let (Some(hex), Some(name), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err("expected \"<sha256>  <filename>\"".to_owned());
    };
    let digest = Sha256Digest::try_from(hex).map_err(|e| e.to_string())?;
    let filename = name.strip_prefix('*').unwrap_or(name);
    if filename.is_empty() {
        return Err("filename is empty".to_owned());
    }
    Ok((digest, filename.to_owned()))
}

/// Build a release table from the archives listed in `checksums`.
///
/// Platforms without a matching archive are left out of the table.
///
/// # Errors
///
/// Returns [`ReleaseError::NoPinnedTargets`] when no supported platform has
/// an archive in the file, or [`ReleaseError::InsecureUrl`] when `base_url`
/// is not HTTPS.
pub fn pin_release_table(
    checksums: &ChecksumsFile,
    binary: &BinaryName,
    version: &ReleaseVersion,
    base_url: &str,
) -> Result<ReleaseTable, ReleaseError> {
    let mut digests = BTreeMap::new();
    for platform in Platform::all() {
        let filename = ArtefactName::new(binary, version, platform).filename();
        match checksums.digest_for(&filename) {
            Some(digest) => {
                debug!("pinned {platform} to {digest}");
                digests.insert(platform, digest.clone());
            }
            None => debug!("no checksum for {filename}; skipping {platform}"),
        }
    }
    if digests.is_empty() {
        return Err(ReleaseError::NoPinnedTargets {
            binary: binary.to_string(),
            version: version.to_string(),
        });
    }
    ReleaseTable::from_digests(version.clone(), binary.clone(), base_url, digests)
}
