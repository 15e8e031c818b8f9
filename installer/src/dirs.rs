//! Directory resolution abstraction for platform-specific paths.
//!
//! The [`BaseDirs`] trait lets the bin directory and configuration lookup be
//! exercised in tests without touching the real home directory.

use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::path::PathBuf;

/// File name of the per-user release table inside the config directory.
pub const RELEASE_TABLE_FILE: &str = "release.toml";

/// Platform directories the installer consults.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// The user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// The platform's per-user executable directory, when it defines one.
    fn bin_dir(&self) -> Option<PathBuf>;

    /// The installer's configuration directory.
    fn azguard_config_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by `directories-next`.
#[derive(Debug, Default)]
pub struct SystemBaseDirs {
    base: Option<directories_next::BaseDirs>,
}

impl SystemBaseDirs {
    /// Query the platform directories for the current user.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: directories_next::BaseDirs::new(),
        }
    }
}

impl BaseDirs for SystemBaseDirs {
    fn home_dir(&self) -> Option<PathBuf> {
        self.base.as_ref().map(|base| base.home_dir().to_path_buf())
    }

    fn bin_dir(&self) -> Option<PathBuf> {
        self.base
            .as_ref()
            .and_then(|base| base.executable_dir().map(std::path::Path::to_path_buf))
    }

    fn azguard_config_dir(&self) -> Option<PathBuf> {
        directories_next::ProjectDirs::from("", "", "azguard")
            .map(|project| project.config_dir().to_path_buf())
    }
}

/// Pick the directory the executable is installed into.
///
/// An explicit directory (from `--bin-dir` or `AZGUARD_BIN_DIR`) wins; then
/// the platform executable directory; then `~/.local/bin`.
///
/// # Errors
///
/// Returns [`InstallerError::BinDirUnresolved`] when the explicit directory
/// is empty, no candidate exists, or the derived path is not valid UTF-8.
pub fn resolve_bin_dir(explicit: Option<&Utf8Path>, dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
    if let Some(dir) = explicit {
        if dir.as_str().trim().is_empty() {
            debug!("explicit bin directory is empty");
            return Err(InstallerError::BinDirUnresolved);
        }
        return Ok(dir.to_owned());
    }
    let candidate = dirs
        .bin_dir()
        .or_else(|| dirs.home_dir().map(|home| home.join(".local").join("bin")))
        .ok_or(InstallerError::BinDirUnresolved)?;
    Utf8PathBuf::from_path_buf(candidate).map_err(|path| {
        debug!("bin directory {} is not valid UTF-8", path.display());
        InstallerError::BinDirUnresolved
    })
}

/// Path of the per-user release table, whether or not it exists.
#[must_use]
pub fn release_table_path(dirs: &dyn BaseDirs) -> Option<Utf8PathBuf> {
    let config_dir = dirs.azguard_config_dir()?;
    Utf8PathBuf::from_path_buf(config_dir.join(RELEASE_TABLE_FILE)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn explicit_bin_dir_wins() {
        let dirs = MockBaseDirs::new();
        let dir = resolve_bin_dir(Some(Utf8Path::new("/opt/azguard/bin")), &dirs)
            .expect("explicit directory");
        assert_eq!(dir, Utf8PathBuf::from("/opt/azguard/bin"));
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("  ")]
    fn empty_explicit_bin_dir_is_rejected(#[case] explicit: &str) {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_bin_dir().never();
        dirs.expect_home_dir().never();

        let result = resolve_bin_dir(Some(Utf8Path::new(explicit)), &dirs);
        assert!(matches!(result, Err(InstallerError::BinDirUnresolved)));
    }

    #[test]
    fn platform_bin_dir_precedes_home_fallback() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_bin_dir()
            .returning(|| Some(PathBuf::from("/home/test/.local/share/bin")));
        dirs.expect_home_dir().never();

        let dir = resolve_bin_dir(None, &dirs).expect("platform directory");
        assert_eq!(dir, Utf8PathBuf::from("/home/test/.local/share/bin"));
    }

    #[test]
    fn falls_back_to_local_bin_under_home() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_bin_dir().returning(|| None);
        dirs.expect_home_dir()
            .returning(|| Some(PathBuf::from("/home/test")));

        let dir = resolve_bin_dir(None, &dirs).expect("home fallback");
        assert_eq!(dir, Utf8PathBuf::from("/home/test/.local/bin"));
    }

    #[test]
    fn reports_unresolved_without_any_directory() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_bin_dir().returning(|| None);
        dirs.expect_home_dir().returning(|| None);

        let err = resolve_bin_dir(None, &dirs).expect_err("nothing to fall back on");
        assert!(matches!(err, InstallerError::BinDirUnresolved));
    }

    #[cfg(unix)]
    #[test]
    fn rejects_non_utf8_bin_dir() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let mut dirs = MockBaseDirs::new();
        dirs.expect_bin_dir().return_once(|| {
            Some(PathBuf::from(OsString::from_vec(vec![
                b'/', b't', b'm', b'p', b'/', 0xff,
            ])))
        });

        let err = resolve_bin_dir(None, &dirs).expect_err("non-UTF-8 path");
        assert!(matches!(err, InstallerError::BinDirUnresolved));
    }

    #[test]
    fn release_table_lives_in_config_dir() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_azguard_config_dir()
            .returning(|| Some(PathBuf::from("/home/test/.config/azguard")));

        assert_eq!(
            release_table_path(&dirs),
            Some(Utf8PathBuf::from("/home/test/.config/azguard/release.toml"))
        );
    }
}
