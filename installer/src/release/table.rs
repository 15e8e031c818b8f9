//! Release table: the static `(os, arch) → (url, sha256)` configuration.
//!
//! Tables are TOML documents:
//!
//! ```toml
//! version = "1.0.0"
//! binary = "azguard"                                             # optional
//! base_url = "https://github.com/cdobratz/AzGuard/releases/download" # optional
//!
//! [targets.linux-amd64]
//! sha256 = "<64 hex characters>"
//! url = "https://..."                                            # optional
//! ```
//!
//! Every check happens while the table loads: a table that parses is safe to
//! resolve against without further validation.

use super::error::ReleaseError;
use super::target::ReleaseTarget;
use super::version::ReleaseVersion;
use crate::artefact::download::is_https;
use crate::artefact::naming::{ArtefactName, BinaryName};
use crate::artefact::sha256_digest::Sha256Digest;
use crate::error::{InstallerError, Result};
use crate::platform::Platform;
use camino::Utf8Path;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Executable name used when a table does not set `binary`.
pub const DEFAULT_BINARY: &str = "azguard";

/// Download base used when a table does not set `base_url`.
pub const DEFAULT_BASE_URL: &str = "https://github.com/cdobratz/AzGuard/releases/download";

/// Origin label for the table compiled into the binary.
pub const BUILTIN_ORIGIN: &str = "built-in table";

const BUILTIN_TABLE: &str = include_str!("builtin.toml");

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct RawReleaseTable {
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    binary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    targets: BTreeMap<String, RawTargetEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct RawTargetEntry {
    sha256: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

/// One validated row of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEntry {
    url: String,
    sha256: Sha256Digest,
}

impl TargetEntry {
    /// Download URL of the archive.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Pinned digest of the archive.
    #[must_use]
    pub fn sha256(&self) -> &Sha256Digest {
        &self.sha256
    }
}

/// A validated release table for a single version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTable {
    version: ReleaseVersion,
    binary: BinaryName,
    base_url: String,
    entries: BTreeMap<Platform, TargetEntry>,
}

impl ReleaseTable {
    /// Parse and validate a table from TOML text.
    ///
    /// `origin` names the source in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError`] for malformed TOML, unknown keys, unsupported
    /// platform keys, non-HTTPS URLs, and empty, placeholder, or malformed
    /// checksums.
    pub fn parse(text: &str, origin: &str) -> std::result::Result<Self, ReleaseError> {
        let raw: RawReleaseTable = toml::from_str(text).map_err(|e| ReleaseError::Parse {
            origin: origin.to_owned(),
            reason: e.to_string(),
        })?;
        Self::from_raw(raw)
    }

    /// Load the table compiled into the installer.
    ///
    /// # Errors
    ///
    /// Fails while the built-in table still carries unfilled checksums.
    pub fn builtin() -> std::result::Result<Self, ReleaseError> {
        Self::parse(BUILTIN_TABLE, BUILTIN_ORIGIN)
    }

    /// Read and validate a table file.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::Read`] if the file cannot be read, otherwise
    /// the same errors as [`Self::parse`].
    pub fn load(path: &Utf8Path) -> std::result::Result<Self, ReleaseError> {
        let text = std::fs::read_to_string(path).map_err(|source| ReleaseError::Read {
            path: path.to_owned(),
            source,
        })?;
        debug!("loaded release table from {path}");
        Self::parse(&text, path.as_str())
    }

    /// Build a table whose URLs follow the standard archive layout.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::EmptyTable`] when `digests` is empty and
    /// [`ReleaseError::InsecureUrl`] when `base_url` is not HTTPS.
    pub fn from_digests(
        version: ReleaseVersion,
        binary: BinaryName,
        base_url: &str,
        digests: BTreeMap<Platform, Sha256Digest>,
    ) -> std::result::Result<Self, ReleaseError> {
        if digests.is_empty() {
            return Err(ReleaseError::EmptyTable);
        }
        let mut entries = BTreeMap::new();
        for (platform, sha256) in digests {
            let url = ArtefactName::new(&binary, &version, platform).url(base_url);
            ensure_https(platform, &url)?;
            entries.insert(platform, TargetEntry { url, sha256 });
        }
        Ok(Self {
            version,
            binary,
            base_url: base_url.to_owned(),
            entries,
        })
    }

    fn from_raw(raw: RawReleaseTable) -> std::result::Result<Self, ReleaseError> {
        let version = ReleaseVersion::try_from(raw.version.as_str())?;
        let binary = BinaryName::try_from(raw.binary.as_deref().unwrap_or(DEFAULT_BINARY))?;
        let base_url = raw
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        if raw.targets.is_empty() {
            return Err(ReleaseError::EmptyTable);
        }

        let mut entries = BTreeMap::new();
        for (key, entry) in raw.targets {
            let platform: Platform = key.parse()?;
            let sha256 = Sha256Digest::try_from(entry.sha256.as_str())
                .map_err(|source| ReleaseError::InvalidEntry { key, source })?;
            let url = entry
                .url
                .unwrap_or_else(|| ArtefactName::new(&binary, &version, platform).url(&base_url));
            ensure_https(platform, &url)?;
            entries.insert(platform, TargetEntry { url, sha256 });
        }

        Ok(Self {
            version,
            binary,
            base_url,
            entries,
        })
    }

    /// Version every archive in the table belongs to.
    #[must_use]
    pub fn version(&self) -> &ReleaseVersion {
        &self.version
    }

    /// Executable name inside the archives.
    #[must_use]
    pub fn binary(&self) -> &BinaryName {
        &self.binary
    }

    /// Base URL that default archive URLs are derived from.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Iterate over the entries in platform order.
    pub fn entries(&self) -> impl Iterator<Item = (Platform, &TargetEntry)> {
        self.entries.iter().map(|(platform, entry)| (*platform, entry))
    }

    /// Look up the archive for `platform` at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::UnknownTarget`] when the table has no entry
    /// for `platform` or describes a different version.
    ///
    /// # Examples
    ///
    /// ```
    /// use azguard_installer::release::table::ReleaseTable;
    /// use azguard_installer::release::version::ReleaseVersion;
    ///
    /// let digest = "ab".repeat(32);
    /// let toml = format!("version = \"1.0.0\"\n[targets.linux-amd64]\nsha256 = \"{digest}\"\n");
    /// let table = ReleaseTable::parse(&toml, "example").expect("valid table");
    /// let version = ReleaseVersion::try_from("1.0.0").expect("valid version");
    ///
    /// let target = table
    ///     .resolve_target("linux-amd64".parse().expect("valid platform"), &version)
    ///     .expect("entry exists");
    /// assert!(target.url().ends_with("/v1.0.0/azguard_1.0.0_linux_amd64.tar.gz"));
    /// ```
    pub fn resolve_target(
        &self,
        platform: Platform,
        version: &ReleaseVersion,
    ) -> Result<ReleaseTarget> {
        let unknown = || InstallerError::UnknownTarget {
            platform: platform.key(),
            version: version.to_string(),
        };
        if *version != self.version {
            return Err(unknown());
        }
        let entry = self.entries.get(&platform).ok_or_else(unknown)?;
        Ok(ReleaseTarget::new(
            platform,
            self.version.clone(),
            entry.url.clone(),
            entry.sha256.clone(),
            self.binary.clone(),
        ))
    }

    /// Render the table as TOML, omitting values equal to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::Serialize`] if rendering fails.
    pub fn to_toml(&self) -> std::result::Result<String, ReleaseError> {
        let targets = self
            .entries
            .iter()
            .map(|(platform, entry)| {
                let derived =
                    ArtefactName::new(&self.binary, &self.version, *platform).url(&self.base_url);
                let url = (entry.url != derived).then(|| entry.url.clone());
                (
                    platform.key(),
                    RawTargetEntry {
                        sha256: entry.sha256.to_string(),
                        url,
                    },
                )
            })
            .collect();
        let raw = RawReleaseTable {
            version: self.version.to_string(),
            binary: (self.binary.as_str() != DEFAULT_BINARY).then(|| self.binary.to_string()),
            base_url: (self.base_url != DEFAULT_BASE_URL).then(|| self.base_url.clone()),
            targets,
        };
        toml::to_string(&raw).map_err(|e| ReleaseError::Serialize {
            reason: e.to_string(),
        })
    }
}

fn ensure_https(platform: Platform, url: &str) -> std::result::Result<(), ReleaseError> {
    if is_https(url) {
        Ok(())
    } else {
        Err(ReleaseError::InsecureUrl {
            key: platform.key(),
            url: url.to_owned(),
        })
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
