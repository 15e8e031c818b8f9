//! Post-install smoke test of the placed executable.
//!
//! Runs `<binary> --version` and requires it to exit successfully within
//! [`SELF_TEST_TIMEOUT`].

use crate::error::{InstallerError, Result};
use camino::Utf8Path;
use log::debug;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

/// Time the executable has to answer `--version` (30 seconds).
pub const SELF_TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Spawn attempts made while the kernel still reports the file as busy.
const SPAWN_ATTEMPTS: u32 = 5;

const SPAWN_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Run `<destination_dir>/<binary_name> --version` and return its output.
///
/// # Errors
///
/// Returns [`InstallerError::PostInstallVerification`] if the executable
/// cannot be started, does not finish within [`SELF_TEST_TIMEOUT`], or exits
/// with a non-zero status.
pub fn self_test(destination_dir: &Utf8Path, binary_name: &str) -> Result<String> {
    run_version_check(&destination_dir.join(binary_name), SELF_TEST_TIMEOUT)
}

/// Run `<executable> --version` with an explicit timeout.
///
/// Returns the first line of standard output, trimmed.
///
/// # Errors
///
/// See [`self_test`].
pub fn run_version_check(executable: &Utf8Path, timeout: Duration) -> Result<String> {
    let failed = |reason: String| InstallerError::PostInstallVerification {
        path: executable.to_owned(),
        reason,
    };

    let capture = || {
        tempfile::tempfile().map_err(|e| failed(format!("could not capture output: {e}")))
    };
    let mut stdout = capture()?;
    let mut stderr = capture()?;
    let mut child = spawn_version(executable, &stdout, &stderr)
        .map_err(|e| failed(format!("could not run: {e}")))?;
    let status = match child
        .wait_timeout(timeout)
        .map_err(|e| failed(format!("could not wait for process: {e}")))?
    {
        Some(status) => status,
        None => {
            if let Err(e) = child.kill().and_then(|()| child.wait().map(drop)) {
                debug!("could not stop {executable}: {e}");
            }
            return Err(failed(format!(
                "--version did not finish within {} seconds",
                timeout.as_secs_f32()
            )));
        }
    };

    let stdout = read_capture(&mut stdout);
    let stderr = read_capture(&mut stderr);
    if !status.success() {
        let detail = stderr.trim();
        return Err(failed(if detail.is_empty() {
            format!("--version exited with {status}")
        } else {
            format!("--version exited with {status}: {detail}")
        }));
    }

    let version = stdout.lines().next().unwrap_or_default().trim().to_owned();
    debug!("{executable} --version reported {version:?}");
    Ok(version)
}

/// Spawn the executable, retrying briefly while a just-closed write handle
/// keeps it busy.
///
/// Output goes to the given files, never to pipes: nothing reads a pipe
/// while the child is waited on.
fn spawn_version(executable: &Utf8Path, stdout: &File, stderr: &File) -> io::Result<Child> {
    let mut attempt = 1;
    loop {
        let spawned = Command::new(executable.as_std_path())
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(stdout.try_clone()?)
            .stderr(stderr.try_clone()?)
            .spawn();
        match spawned {
            Err(e) if e.kind() == io::ErrorKind::ExecutableFileBusy && attempt < SPAWN_ATTEMPTS => {
                debug!("{executable} is busy; retrying spawn");
                attempt += 1;
                thread::sleep(SPAWN_RETRY_DELAY);
            }
            other => return other,
        }
    }
}

/// Read back everything the child wrote to `file`.
fn read_capture(file: &mut File) -> String {
    let mut bytes = Vec::new();
    if let Err(e) = file
        .seek(SeekFrom::Start(0))
        .and_then(|_| file.read_to_end(&mut bytes))
    {
        debug!("could not read captured output: {e}");
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_utils::{failing_executable_script, fake_executable_script};
    use camino::Utf8PathBuf;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, body: &[u8]) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(dir.path().join("azguard")).expect("UTF-8 path");
        std::fs::write(&path, body).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");
        path
    }

    #[test]
    fn returns_first_line_of_version_output() {
        let dir = tempfile::tempdir().expect("temp dir");
        write_script(&dir, &fake_executable_script("1.0.0"));
        let bin_dir = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("UTF-8 path");

        let output = self_test(&bin_dir, "azguard").expect("self test passes");
        assert_eq!(output, "azguard version 1.0.0");
    }

    #[test]
    fn non_zero_exit_fails_with_stderr() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_script(&dir, &failing_executable_script());

        let err = run_version_check(&path, SELF_TEST_TIMEOUT).expect_err("must fail");
        match err {
            InstallerError::PostInstallVerification { path: failed, reason } => {
                assert_eq!(failed, path);
                assert!(reason.contains("broken install"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_executable_fails_to_spawn() {
        let dir = tempfile::tempdir().expect("temp dir");
        let bin_dir = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("UTF-8 path");

        let err = self_test(&bin_dir, "azguard").expect_err("nothing to run");
        assert!(matches!(
            err,
            InstallerError::PostInstallVerification { ref reason, .. } if reason.contains("could not run")
        ));
    }

    #[test]
    fn output_larger_than_a_pipe_buffer_still_passes() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_script(
            &dir,
            b"#!/bin/sh\necho \"azguard version 1.0.0\"\nhead -c 200000 /dev/zero\nexit 0\n",
        );

        let output = run_version_check(&path, Duration::from_secs(10)).expect("exits zero");
        assert_eq!(output, "azguard version 1.0.0");
    }

    #[test]
    fn large_stderr_is_reported_on_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_script(
            &dir,
            b"#!/bin/sh\nhead -c 200000 /dev/zero >&2\necho \"broken install\" >&2\nexit 2\n",
        );

        let err = run_version_check(&path, Duration::from_secs(10)).expect_err("exits non-zero");
        assert!(matches!(
            err,
            InstallerError::PostInstallVerification { ref reason, .. } if reason.contains("exited with")
        ));
    }

    #[test]
    fn hung_executable_times_out() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_script(&dir, b"#!/bin/sh\nsleep 10\n");

        let err =
            run_version_check(&path, Duration::from_millis(200)).expect_err("must time out");
        assert!(matches!(
            err,
            InstallerError::PostInstallVerification { ref reason, .. } if reason.contains("did not finish")
        ));
    }
}
