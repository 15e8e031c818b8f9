//! The resolved download for one platform.

use crate::artefact::naming::BinaryName;
use crate::artefact::sha256_digest::Sha256Digest;
use crate::platform::{Architecture, OperatingSystem, Platform};
use crate::release::version::ReleaseVersion;

/// Everything needed to fetch and verify the archive for one platform.
///
/// Built from the release table at install time and dropped once the install
/// finishes; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTarget {
    platform: Platform,
    version: ReleaseVersion,
    url: String,
    expected_checksum: Sha256Digest,
    binary: BinaryName,
}

impl ReleaseTarget {
    /// Assemble a target from validated parts.
    #[must_use]
    pub fn new(
        platform: Platform,
        version: ReleaseVersion,
        url: String,
        expected_checksum: Sha256Digest,
        binary: BinaryName,
    ) -> Self {
        Self {
            platform,
            version,
            url,
            expected_checksum,
            binary,
        }
    }

    /// Platform the archive was built for.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Operating system the archive was built for.
    #[must_use]
    pub fn operating_system(&self) -> OperatingSystem {
        self.platform.os
    }

    /// Architecture the archive was built for.
    #[must_use]
    pub fn architecture(&self) -> Architecture {
        self.platform.arch
    }

    /// Release version.
    #[must_use]
    pub fn version(&self) -> &ReleaseVersion {
        &self.version
    }

    /// Download URL of the archive.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Digest the downloaded archive must match.
    #[must_use]
    pub fn expected_checksum(&self) -> &Sha256Digest {
        &self.expected_checksum
    }

    /// Name of the executable inside the archive and in the bin directory.
    #[must_use]
    pub fn binary(&self) -> &BinaryName {
        &self.binary
    }
}
