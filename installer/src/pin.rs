//! Pin command implementation.
//!
//! Turns a published checksums file into a release table that the install
//! command accepts through `--manifest` or the per-user `release.toml`.

use crate::artefact::naming::BinaryName;
use crate::cli::PinArgs;
use crate::error::{InstallerError, Result};
use crate::output::write_stderr_line;
use crate::release::checksums::{ChecksumsFile, pin_release_table};
use crate::release::error::ReleaseError;
use crate::release::version::ReleaseVersion;
use camino::Utf8Path;
use log::debug;
use std::io::Write;

/// Suffix of the checksums file published with each release.
const CHECKSUMS_SUFFIX: &str = "_checksums.txt";

/// Pin a release table from `args.checksums`.
///
/// The table is written to `args.output` when given, otherwise to `stdout`.
///
/// # Errors
///
/// Returns [`InstallerError::Config`] if the checksums file cannot be read or
/// parsed, no version is known, no supported platform is listed, or the
/// output file cannot be written. Returns [`InstallerError::WriteFailed`] if
/// writing to `stdout` fails.
pub fn run_pin(args: &PinArgs, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let text = std::fs::read_to_string(&args.checksums).map_err(|source| ReleaseError::Read {
        path: args.checksums.clone(),
        source,
    })?;
    let checksums = ChecksumsFile::parse(&text)?;
    let binary = BinaryName::try_from(args.binary.as_str()).map_err(ReleaseError::from)?;
    let version = match &args.release {
        Some(release) => ReleaseVersion::try_from(release.as_str())?,
        None => version_from_filename(&args.checksums, &binary)?,
    };
    debug!(
        "pinning {binary} {version} from {} checksum entries",
        checksums.len()
    );

    let table = pin_release_table(&checksums, &binary, &version, &args.base_url)?;
    let rendered = table.to_toml()?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(|source| ReleaseError::Write {
                path: path.clone(),
                source,
            })?;
            let count = table.entries().count();
            write_stderr_line(
                stderr,
                format!("Pinned {count} target(s) for {binary} {version} to {path}"),
            );
        }
        None => {
            stdout
                .write_all(rendered.as_bytes())
                .map_err(|e| InstallerError::WriteFailed { source: e })?;
        }
    }
    Ok(())
}

/// Read the version out of `<binary>_<version>_checksums.txt`.
fn version_from_filename(
    path: &Utf8Path,
    binary: &BinaryName,
) -> std::result::Result<ReleaseVersion, ReleaseError> {
    let file_name = path.file_name().unwrap_or_default();
    let prefix = format!("{binary}_");
    let version = file_name
        .strip_suffix(CHECKSUMS_SUFFIX)
        .and_then(|stem| stem.strip_prefix(prefix.as_str()))
        .ok_or_else(|| ReleaseError::InvalidVersion {
            value: file_name.to_owned(),
            reason: format!(
                "expected a {prefix}<version>{CHECKSUMS_SUFFIX} file name; pass --release"
            ),
        })?;
    ReleaseVersion::try_from(version)
}
