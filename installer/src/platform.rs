//! Host platform detection.
//!
//! Prebuilt azguard archives are published for two operating systems and two
//! CPU architectures. Names here match the artefact filenames (`darwin`,
//! `linux`, `arm64`, `amd64`), not Rust's `std::env::consts` spellings.

use crate::error::{InstallerError, Result};
use std::fmt;
use std::str::FromStr;

/// Operating systems with published azguard archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperatingSystem {
    /// macOS.
    Darwin,
    /// Linux.
    Linux,
}

impl OperatingSystem {
    /// Every supported operating system.
    pub const ALL: [Self; 2] = [Self::Darwin, Self::Linux];

    /// Return the name used in artefact filenames.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::Linux => "linux",
        }
    }

    /// Map a host OS name (`std::env::consts::OS` or an artefact name).
    #[must_use]
    pub fn from_host_name(name: &str) -> Option<Self> {
        match name {
            "macos" | "darwin" => Some(Self::Darwin),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }
}

/// CPU architectures with published azguard archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Architecture {
    /// 64-bit ARM (`aarch64`).
    Arm64,
    /// 64-bit x86 (`x86_64`).
    Amd64,
}

impl Architecture {
    /// Every supported architecture.
    pub const ALL: [Self; 2] = [Self::Arm64, Self::Amd64];

    /// Return the name used in artefact filenames.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arm64 => "arm64",
            Self::Amd64 => "amd64",
        }
    }

    /// Map a host architecture name (`std::env::consts::ARCH` or an artefact name).
    #[must_use]
    pub fn from_host_name(name: &str) -> Option<Self> {
        match name {
            "aarch64" | "arm64" => Some(Self::Arm64),
            "x86_64" | "amd64" => Some(Self::Amd64),
            _ => None,
        }
    }
}

/// An `(operating system, architecture)` pair.
///
/// # Examples
///
/// ```
/// use azguard_installer::platform::{Architecture, OperatingSystem, Platform};
///
/// let platform = Platform::from_host_names("macos", "aarch64").expect("supported");
/// assert_eq!(platform.os, OperatingSystem::Darwin);
/// assert_eq!(platform.arch, Architecture::Arm64);
/// assert_eq!(platform.key(), "darwin-arm64");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Platform {
    /// Operating system component.
    pub os: OperatingSystem,
    /// Architecture component.
    pub arch: Architecture,
}

impl Platform {
    /// Create a platform from its components.
    #[must_use]
    pub const fn new(os: OperatingSystem, arch: Architecture) -> Self {
        Self { os, arch }
    }

    /// Every supported platform, in table order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        OperatingSystem::ALL
            .iter()
            .flat_map(|os| Architecture::ALL.iter().map(|arch| Self::new(*os, *arch)))
            .collect()
    }

    /// Resolve host OS and architecture names into a supported platform.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::UnsupportedPlatform`] when either name is
    /// outside the supported set.
    pub fn from_host_names(os: &str, arch: &str) -> Result<Self> {
        match (
            OperatingSystem::from_host_name(os),
            Architecture::from_host_name(arch),
        ) {
            (Some(os), Some(arch)) => Ok(Self::new(os, arch)),
            _ => Err(InstallerError::UnsupportedPlatform {
                os: os.to_owned(),
                arch: arch.to_owned(),
            }),
        }
    }

    /// Return the release-table key, e.g. `linux-amd64`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}-{}", self.os.as_str(), self.arch.as_str())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}

/// Error returned when a release-table key is not a supported platform.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported platform key \"{key}\"; expected one of: {expected}")]
pub struct PlatformKeyError {
    /// The rejected key.
    pub key: String,
    /// Comma-separated list of accepted keys.
    pub expected: String,
}

impl FromStr for Platform {
    type Err = PlatformKeyError;

    fn from_str(key: &str) -> std::result::Result<Self, Self::Err> {
        let reject = || PlatformKeyError {
            key: key.to_owned(),
            expected: Self::all()
                .iter()
                .map(Self::key)
                .collect::<Vec<_>>()
                .join(", "),
        };
        let (os, arch) = key.split_once('-').ok_or_else(reject)?;
        let os = OperatingSystem::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == os)
            .ok_or_else(reject)?;
        let arch = Architecture::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == arch)
            .ok_or_else(reject)?;
        Ok(Self::new(os, arch))
    }
}

/// Source of the platform an install targets.
///
/// The pipeline asks the detector before doing anything else so that an
/// unsupported host never reaches the network.
#[cfg_attr(test, mockall::automock)]
pub trait PlatformDetector {
    /// Detect the platform to install for.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::UnsupportedPlatform`] for hosts without a
    /// published archive.
    fn detect(&self) -> Result<Platform>;
}

/// Detector that inspects the running host.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostPlatform;

impl PlatformDetector for HostPlatform {
    fn detect(&self) -> Result<Platform> {
        detect_platform()
    }
}

/// Detect the platform of the running host.
///
/// # Errors
///
/// Returns [`InstallerError::UnsupportedPlatform`] when the host is neither
/// darwin nor linux, or neither arm64 nor amd64.
pub fn detect_platform() -> Result<Platform> {
    Platform::from_host_names(std::env::consts::OS, std::env::consts::ARCH)
}
