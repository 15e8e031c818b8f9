//! Selection of the release table to install from.
//!
//! Sources are consulted in order and the first match wins: an explicit path
//! (`--manifest` or `AZGUARD_MANIFEST`), the per-user `release.toml`, then
//! the table compiled into the installer.

use super::error::ReleaseError;
use super::table::{BUILTIN_ORIGIN, ReleaseTable};
use crate::dirs::{BaseDirs, release_table_path};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fmt;

/// Where a release table was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// A path given on the command line or in the environment.
    Explicit(Utf8PathBuf),
    /// The per-user table in the config directory.
    UserConfig(Utf8PathBuf),
    /// The table compiled into the installer.
    Builtin,
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(path) | Self::UserConfig(path) => write!(f, "{path}"),
            Self::Builtin => f.write_str(BUILTIN_ORIGIN),
        }
    }
}

/// Pick the table source without reading it.
#[must_use]
pub fn select_source(explicit: Option<&Utf8Path>, dirs: &dyn BaseDirs) -> TableSource {
    if let Some(path) = explicit {
        return TableSource::Explicit(path.to_owned());
    }
    match release_table_path(dirs) {
        Some(path) if path.is_file() => TableSource::UserConfig(path),
        _ => TableSource::Builtin,
    }
}

/// Load and validate the release table from the first available source.
///
/// # Errors
///
/// Returns [`ReleaseError`] when the selected table cannot be read or fails
/// validation. A broken explicit or user table is never skipped in favour of
/// the next source.
pub fn load_release_table(
    explicit: Option<&Utf8Path>,
    dirs: &dyn BaseDirs,
) -> Result<(ReleaseTable, TableSource), ReleaseError> {
    let source = select_source(explicit, dirs);
    debug!("using release table from {source}");
    let table = match &source {
        TableSource::Explicit(path) | TableSource::UserConfig(path) => ReleaseTable::load(path)?,
        TableSource::Builtin => ReleaseTable::builtin()?,
    };
    Ok((table, source))
}
