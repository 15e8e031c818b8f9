//! Artefact naming policy for published azguard archives.
//!
//! Release archives follow the layout produced by the upstream release
//! pipeline: `<binary>_<version>_<os>_<arch>.tar.gz`, served from
//! `<base_url>/v<version>/`.

use super::error::{ArtefactError, Result};
use crate::platform::Platform;
use crate::release::version::ReleaseVersion;
use std::fmt;

/// The fixed file extension for release archives.
const ARTEFACT_EXTENSION: &str = ".tar.gz";

/// A validated executable name: a single, non-empty path component.
///
/// # Examples
///
/// ```
/// use azguard_installer::artefact::naming::BinaryName;
///
/// let name = BinaryName::try_from("azguard").expect("valid name");
/// assert_eq!(name.as_str(), "azguard");
/// assert!(BinaryName::try_from("../azguard").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinaryName(String);

impl BinaryName {
    /// Return the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for BinaryName {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        let reject = |reason: &str| ArtefactError::InvalidBinaryName {
            value: value.to_owned(),
            reason: reason.to_owned(),
        };
        if value.trim().is_empty() {
            return Err(reject("name is empty"));
        }
        if value == "." || value == ".." {
            return Err(reject("name is a relative directory"));
        }
        if value.contains(['/', '\\']) {
            return Err(reject("name contains a path separator"));
        }
        Ok(Self(value.to_owned()))
    }
}

impl fmt::Display for BinaryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully-qualified release archive name.
///
/// # Examples
///
/// ```
/// use azguard_installer::artefact::naming::{ArtefactName, BinaryName};
/// use azguard_installer::platform::Platform;
/// use azguard_installer::release::version::ReleaseVersion;
///
/// let binary = BinaryName::try_from("azguard").expect("valid name");
/// let version = ReleaseVersion::try_from("1.0.0").expect("valid version");
/// let platform: Platform = "linux-amd64".parse().expect("valid platform");
///
/// let name = ArtefactName::new(&binary, &version, platform);
/// assert_eq!(name.filename(), "azguard_1.0.0_linux_amd64.tar.gz");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtefactName {
    binary: BinaryName,
    version: ReleaseVersion,
    platform: Platform,
}

impl ArtefactName {
    /// Create an artefact name from validated components.
    #[must_use]
    pub fn new(binary: &BinaryName, version: &ReleaseVersion, platform: Platform) -> Self {
        Self {
            binary: binary.clone(),
            version: version.clone(),
            platform,
        }
    }

    /// Return the archive filename.
    #[must_use]
    pub fn filename(&self) -> String {
        format!(
            "{}_{}_{}_{}{ARTEFACT_EXTENSION}",
            self.binary,
            self.version,
            self.platform.os.as_str(),
            self.platform.arch.as_str()
        )
    }

    /// Return the download URL under `base_url`.
    ///
    /// Archives live under the release tag, the version prefixed with `v`.
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.version.tag(),
            self.filename()
        )
    }
}

impl fmt::Display for ArtefactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.filename())
    }
}
