//! Targets command implementation.
//!
//! Prints the release table the installer would use, marking the running
//! host's platform. Output is human-readable by default, JSON with `--json`.

use crate::cli::TargetsArgs;
use crate::dirs::BaseDirs;
use crate::error::{InstallerError, Result};
use crate::platform::{Platform, detect_platform};
use crate::release::source::{TableSource, load_release_table};
use crate::release::table::ReleaseTable;
use log::trace;
use serde::Serialize;
use std::io::Write;

/// Load the release table and print its targets to `stdout`.
///
/// # Errors
///
/// Returns [`InstallerError::Config`] if the table cannot be loaded and
/// [`InstallerError::WriteFailed`] if writing to `stdout` fails.
pub fn run_targets(args: &TargetsArgs, dirs: &dyn BaseDirs, stdout: &mut dyn Write) -> Result<()> {
    let (table, source) = load_release_table(args.manifest.as_deref(), dirs)?;
    let host = match detect_platform() {
        Ok(platform) => Some(platform),
        Err(e) => {
            trace!("host platform not marked: {e}");
            None
        }
    };
    write_targets(&table, &source, host, args.json, stdout)
}

fn write_targets(
    table: &ReleaseTable,
    source: &TableSource,
    host: Option<Platform>,
    json: bool,
    stdout: &mut dyn Write,
) -> Result<()> {
    let output = if json {
        format_json(table, host)
    } else {
        format_human(table, source, host)
    };
    writeln!(stdout, "{output}").map_err(|e| InstallerError::WriteFailed { source: e })
}

/// Format the table for human-readable output.
#[must_use]
pub fn format_human(table: &ReleaseTable, source: &TableSource, host: Option<Platform>) -> String {
    let header = format!(
        "{} {} (release table: {source})",
        table.binary(),
        table.version()
    );
    let rows = table.entries().map(|(platform, entry)| {
        let marker = if Some(platform) == host { "  (host)" } else { "" };
        format!(
            "  {:<13} {}\n    sha256 {}{marker}",
            platform.key(),
            entry.url(),
            entry.sha256()
        )
    });
    std::iter::once(header)
        .chain(std::iter::once(String::new()))
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the table as JSON.
///
/// # Examples
///
/// ```
/// use azguard_installer::release::table::ReleaseTable;
/// use azguard_installer::targets::format_json;
///
/// let toml = format!("version = \"1.0.0\"\n[targets.linux-arm64]\nsha256 = \"{}\"\n", "cd".repeat(32));
/// let table = ReleaseTable::parse(&toml, "example").expect("valid table");
/// let json = format_json(&table, None);
/// assert!(json.contains("\"linux-arm64\""));
/// ```
#[must_use]
pub fn format_json(table: &ReleaseTable, host: Option<Platform>) -> String {
    let document = TargetsJson {
        version: table.version().to_string(),
        binary: table.binary().to_string(),
        host: host.map(|platform| platform.key()),
        targets: table
            .entries()
            .map(|(platform, entry)| TargetJson {
                platform: platform.key(),
                url: entry.url().to_owned(),
                sha256: entry.sha256().to_string(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&document).unwrap_or_else(|_| "{}".to_owned())
}

/// JSON document printed by `targets --json`.
#[derive(Debug, Serialize)]
pub struct TargetsJson {
    /// Release version of the table.
    pub version: String,
    /// Executable name.
    pub binary: String,
    /// Platform key of the running host, if supported.
    pub host: Option<String>,
    /// One entry per platform.
    pub targets: Vec<TargetJson>,
}

/// JSON entry for one platform.
#[derive(Debug, Serialize)]
pub struct TargetJson {
    /// Platform key, e.g. `linux-amd64`.
    pub platform: String,
    /// Archive URL.
    pub url: String,
    /// Pinned archive digest.
    pub sha256: String,
}
