//! Install pipeline orchestration.
//!
//! Runs the install steps strictly in order: detect the platform, resolve
//! the target, fetch, verify, extract, place, and smoke-test. Any failure
//! aborts the run; nothing is retried.

use crate::artefact::download::{ArtefactFetcher, HttpFetcher};
use crate::artefact::extraction::extract;
use crate::artefact::verification::verify;
use crate::error::Result;
use crate::output::write_stderr_line;
use crate::placement::{Placement, install};
use crate::platform::{HostPlatform, PlatformDetector};
use crate::release::table::ReleaseTable;
use crate::release::target::ReleaseTarget;
use crate::release::version::ReleaseVersion;
use crate::self_test::self_test;
use camino::{Utf8Path, Utf8PathBuf};
use log::{info, warn};
use std::io::Write;

/// Inputs for one install run.
#[derive(Debug, Clone, Copy)]
pub struct InstallRequest<'a> {
    /// Validated release table to resolve against.
    pub table: &'a ReleaseTable,
    /// Version to install; defaults to the table's version.
    pub version: Option<&'a ReleaseVersion>,
    /// Directory the executable is placed in.
    pub bin_dir: &'a Utf8Path,
    /// Stop after resolving the target.
    pub dry_run: bool,
    /// Suppress progress output.
    pub quiet: bool,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The executable was placed and passed its smoke test.
    Installed {
        /// The target that was installed.
        target: ReleaseTarget,
        /// Path of the installed executable.
        path: Utf8PathBuf,
        /// First line of `--version` output.
        version_output: String,
    },
    /// Dry run; nothing was fetched or written.
    DryRun {
        /// The target that would be installed.
        target: ReleaseTarget,
        /// Where the executable would be placed.
        destination: Utf8PathBuf,
    },
}

/// Install for the running host over HTTPS.
///
/// # Errors
///
/// See [`run_install_with`].
pub fn run_install(request: &InstallRequest<'_>, stderr: &mut dyn Write) -> Result<InstallOutcome> {
    run_install_with(request, &HostPlatform, &HttpFetcher, stderr)
}

/// Install using the given platform detector and fetcher.
///
/// The platform is detected before any network access. A checksum or
/// archive failure leaves the bin directory untouched. If the smoke test
/// fails, the new executable is removed and any previous one restored.
///
/// # Errors
///
/// Returns the [`InstallerError`](crate::error::InstallerError) of the first
/// step that fails.
pub fn run_install_with(
    request: &InstallRequest<'_>,
    detector: &dyn PlatformDetector,
    fetcher: &dyn ArtefactFetcher,
    stderr: &mut dyn Write,
) -> Result<InstallOutcome> {
    let platform = detector.detect()?;
    let version = request.version.unwrap_or_else(|| request.table.version());
    let target = request.table.resolve_target(platform, version)?;
    let binary = target.binary().as_str();
    let destination = request.bin_dir.join(binary);

    if request.dry_run {
        return Ok(InstallOutcome::DryRun {
            target,
            destination,
        });
    }

    progress(request, stderr, format!("Downloading {}...", target.url()));
    let archive = fetcher.fetch(target.url())?;
    let archive = verify(archive, target.expected_checksum(), target.url())?;
    progress(
        request,
        stderr,
        format!("Verified sha256 {}", target.expected_checksum()),
    );
    let executable = extract(&archive, binary)?;

    progress(request, stderr, format!("Installing to {destination}..."));
    let placement = Placement::begin(request.bin_dir, binary)?;
    let placed = install(&executable, request.bin_dir, binary)
        .and_then(|path| self_test(request.bin_dir, binary).map(|output| (path, output)));

    match placed {
        Ok((path, version_output)) => {
            if let Err(err) = placement.commit() {
                warn!("could not remove previous binary: {err}");
            }
            info!("installed {} {} at {path}", binary, target.version());
            Ok(InstallOutcome::Installed {
                target,
                path,
                version_output,
            })
        }
        Err(err) => {
            let restoring = placement.replaces_existing();
            match placement.rollback() {
                Ok(()) if restoring => {
                    progress(request, stderr, "Restored the previous binary.");
                }
                Ok(()) => {}
                Err(rollback_err) => warn!("rollback failed: {rollback_err}"),
            }
            Err(err)
        }
    }
}

fn progress(request: &InstallRequest<'_>, stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if !request.quiet {
        write_stderr_line(stderr, message);
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
