//! Atomic placement of the executable in the bin directory.
//!
//! The executable is written to a temporary file inside the destination
//! directory and renamed over `<dir>/<binary>`, so readers of the directory
//! see either the old file or the complete new one. A [`Placement`] keeps any
//! previous binary aside until the new one has passed its smoke test.

use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;
use std::io::{self, Write};

/// Mode bits applied to the installed executable.
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// Write `executable` to `<destination_dir>/<binary_name>` atomically.
///
/// Creates `destination_dir` if needed. On failure the temporary file is
/// removed and nothing is left at the destination path.
///
/// # Errors
///
/// Returns [`InstallerError::Filesystem`] if the directory cannot be
/// created, or the file cannot be written, made executable, or renamed.
pub fn install(
    executable: &[u8],
    destination_dir: &Utf8Path,
    binary_name: &str,
) -> Result<Utf8PathBuf> {
    fs::create_dir_all(destination_dir)
        .map_err(|e| InstallerError::filesystem(destination_dir, &e))?;
    let destination = destination_dir.join(binary_name);

    let mut staged = tempfile::Builder::new()
        .prefix(&format!(".{binary_name}."))
        .suffix(".partial")
        .tempfile_in(destination_dir)
        .map_err(|e| InstallerError::filesystem(destination_dir, &e))?;
    staged
        .write_all(executable)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| InstallerError::filesystem(destination.as_path(), &e))?;
    make_executable(staged.path())
        .map_err(|e| InstallerError::filesystem(destination.as_path(), &e))?;

    staged
        .persist(&destination)
        .map_err(|e| InstallerError::filesystem(destination.as_path(), &e.error))?;
    debug!("placed {} bytes at {destination}", executable.len());
    Ok(destination)
}

#[cfg(unix)]
fn make_executable(path: &std::path::Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE))
}

#[cfg(not(unix))]
fn make_executable(_path: &std::path::Path) -> io::Result<()> {
    Ok(())
}

/// An in-progress replacement of `<dir>/<binary>`.
///
/// [`Placement::begin`] moves an existing binary aside. The caller then
/// installs and tests the new one and finishes with either
/// [`Placement::commit`] or [`Placement::rollback`].
#[derive(Debug)]
pub struct Placement {
    destination: Utf8PathBuf,
    backup: Option<Utf8PathBuf>,
}

impl Placement {
    /// Start replacing `<destination_dir>/<binary_name>`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Filesystem`] if the existing binary cannot be
    /// moved aside.
    pub fn begin(destination_dir: &Utf8Path, binary_name: &str) -> Result<Self> {
        let destination = destination_dir.join(binary_name);
        let backup = match fs::symlink_metadata(&destination) {
            Ok(_) => {
                let backup = destination_dir.join(format!(".{binary_name}.previous"));
                fs::rename(&destination, &backup)
                    .map_err(|e| InstallerError::filesystem(destination.as_path(), &e))?;
                debug!("moved previous {destination} to {backup}");
                Some(backup)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(InstallerError::filesystem(destination, &e)),
        };
        Ok(Self {
            destination,
            backup,
        })
    }

    /// Path the new binary is placed at.
    #[must_use]
    pub fn destination(&self) -> &Utf8Path {
        &self.destination
    }

    /// Whether a previous binary was moved aside.
    #[must_use]
    pub fn replaces_existing(&self) -> bool {
        self.backup.is_some()
    }

    /// Keep the new binary and discard the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Filesystem`] if the backup cannot be removed.
    pub fn commit(self) -> Result<()> {
        if let Some(backup) = &self.backup {
            fs::remove_file(backup)
                .map_err(|e| InstallerError::filesystem(backup.as_path(), &e))?;
        }
        Ok(())
    }

    /// Remove the new binary and put the previous one back.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Filesystem`] if either step fails.
    pub fn rollback(self) -> Result<()> {
        match fs::remove_file(&self.destination) {
            Ok(()) => debug!("removed {}", self.destination),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(InstallerError::filesystem(self.destination, &e)),
        }
        if let Some(backup) = &self.backup {
            fs::rename(backup, &self.destination)
                .map_err(|e| InstallerError::filesystem(self.destination.as_path(), &e))?;
            debug!("restored previous {}", self.destination);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    const BINARY: &str = "azguard";

    #[fixture]
    fn temp_dir() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("UTF-8 temp dir")
    }

    fn listing(dir: &Utf8Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("read dir")
            .map(|entry| {
                entry
                    .expect("dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }

    #[rstest]
    fn install_creates_missing_directory(temp_dir: TempDir) {
        let bin_dir = utf8(&temp_dir).join("nested").join("bin");
        let path = install(b"binary", &bin_dir, BINARY).expect("install");
        assert_eq!(path, bin_dir.join(BINARY));
        assert_eq!(fs::read(&path).expect("read"), b"binary");
        assert_eq!(listing(&bin_dir), vec![BINARY.to_owned()]);
    }

    #[cfg(unix)]
    #[rstest]
    fn install_sets_executable_mode(temp_dir: TempDir) {
        use std::os::unix::fs::PermissionsExt;

        let path = install(b"binary", &utf8(&temp_dir), BINARY).expect("install");
        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[rstest]
    fn install_replaces_existing_file(temp_dir: TempDir) {
        let dir = utf8(&temp_dir);
        fs::write(dir.join(BINARY), b"old").expect("seed");
        install(b"new", &dir, BINARY).expect("install");
        assert_eq!(fs::read(dir.join(BINARY)).expect("read"), b"new");
        assert_eq!(listing(&dir), vec![BINARY.to_owned()]);
    }

    #[rstest]
    fn install_fails_when_destination_is_a_file(temp_dir: TempDir) {
        let blocker = utf8(&temp_dir).join("not-a-dir");
        fs::write(&blocker, b"").expect("seed");
        let err = install(b"binary", &blocker, BINARY).expect_err("cannot create dir");
        assert!(matches!(err, InstallerError::Filesystem { .. }));
    }

    #[rstest]
    fn failed_rename_leaves_no_partial_file(temp_dir: TempDir) {
        let dir = utf8(&temp_dir);
        let occupied = dir.join(BINARY);
        fs::create_dir(&occupied).expect("seed directory");
        fs::write(occupied.join("keep"), b"contents").expect("seed file");

        let err = install(b"binary", &dir, BINARY).expect_err("destination is a directory");
        assert!(
            matches!(err, InstallerError::Filesystem { ref path, .. } if *path == occupied),
            "unexpected error: {err:?}"
        );
        assert_eq!(listing(&dir), vec![BINARY.to_owned()]);
        assert!(occupied.is_dir());
        assert_eq!(listing(&occupied), vec!["keep".to_owned()]);
    }

    #[rstest]
    fn begin_without_previous_binary(temp_dir: TempDir) {
        let dir = utf8(&temp_dir);
        let placement = Placement::begin(&dir, BINARY).expect("begin");
        assert!(!placement.replaces_existing());
        assert_eq!(placement.destination(), dir.join(BINARY).as_path());
    }

    #[rstest]
    fn rollback_restores_previous_binary(temp_dir: TempDir) {
        let dir = utf8(&temp_dir);
        fs::write(dir.join(BINARY), b"old").expect("seed");

        let placement = Placement::begin(&dir, BINARY).expect("begin");
        assert!(placement.replaces_existing());
        install(b"new", &dir, BINARY).expect("install");
        placement.rollback().expect("rollback");

        assert_eq!(fs::read(dir.join(BINARY)).expect("read"), b"old");
        assert_eq!(listing(&dir), vec![BINARY.to_owned()]);
    }

    #[rstest]
    fn rollback_without_previous_leaves_directory_empty(temp_dir: TempDir) {
        let dir = utf8(&temp_dir);
        let placement = Placement::begin(&dir, BINARY).expect("begin");
        install(b"new", &dir, BINARY).expect("install");
        placement.rollback().expect("rollback");
        assert!(listing(&dir).is_empty());
    }

    #[rstest]
    fn commit_discards_backup(temp_dir: TempDir) {
        let dir = utf8(&temp_dir);
        fs::write(dir.join(BINARY), b"old").expect("seed");

        let placement = Placement::begin(&dir, BINARY).expect("begin");
        install(b"new", &dir, BINARY).expect("install");
        placement.commit().expect("commit");

        assert_eq!(fs::read(dir.join(BINARY)).expect("read"), b"new");
        assert_eq!(listing(&dir), vec![BINARY.to_owned()]);
    }
}
