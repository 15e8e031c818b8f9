//! CLI argument definitions for the azguard installer.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::release::table::{DEFAULT_BASE_URL, DEFAULT_BINARY};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Environment variable naming the bin directory.
pub const BIN_DIR_ENV: &str = "AZGUARD_BIN_DIR";

/// Environment variable naming the release table file.
pub const MANIFEST_ENV: &str = "AZGUARD_MANIFEST";

/// Install the prebuilt azguard binary.
#[derive(Parser, Debug)]
#[command(name = "azguard-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install the prebuilt azguard binary.\n\n",
    "The installer picks the archive for this host from a release table, ",
    "downloads it over HTTPS, checks its SHA-256 digest, extracts the azguard ",
    "executable, places it in a bin directory, and runs `azguard --version` ",
    "to confirm it works. Any failure aborts the install and keeps the ",
    "previous binary.\n\n",
    "Release tables come from --manifest, then AZGUARD_MANIFEST, then ",
    "release.toml in the azguard config directory, then the table built into ",
    "the installer. Use `pin` to create one from a release's checksums file.",
))]
#[command(after_help = concat!(
    "SUPPORTED PLATFORMS:\n",
    "  darwin-arm64, darwin-amd64, linux-arm64, linux-amd64\n\n",
    "EXAMPLES:\n",
    "  Pin the release checksums into a table:\n",
    "    $ azguard-installer pin --checksums azguard_1.0.0_checksums.txt -o release.toml\n\n",
    "  Install using that table:\n",
    "    $ azguard-installer --manifest release.toml\n\n",
    "  Install into a custom directory:\n",
    "    $ azguard-installer --manifest release.toml --bin-dir /usr/local/bin\n\n",
    "  Show what would be installed:\n",
    "    $ azguard-installer --manifest release.toml --dry-run\n\n",
    "  List the table's targets as JSON:\n",
    "    $ azguard-installer targets --manifest release.toml --json\n\n",
    "For more information, see: https://github.com/cdobratz/AzGuard",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Install arguments (used when no subcommand is given).
    #[command(flatten)]
    pub install: InstallArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Install azguard (default when no subcommand given).
    Install(InstallArgs),

    /// List the release table's targets.
    Targets(TargetsArgs),

    /// Create a release table from a published checksums file.
    Pin(PinArgs),
}

/// Arguments for the install command.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallArgs {
    /// Directory to install azguard into [default: platform-specific].
    #[arg(short, long, value_name = "DIR", env = BIN_DIR_ENV)]
    pub bin_dir: Option<Utf8PathBuf>,

    /// Release table to install from.
    #[arg(short, long, value_name = "FILE", env = MANIFEST_ENV)]
    pub manifest: Option<Utf8PathBuf>,

    /// Release version to install [default: the table's version].
    #[arg(short, long, value_name = "VERSION")]
    pub release: Option<String>,

    /// Resolve the download and exit without fetching or writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        alias = "verbosity",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Arguments for the targets command.
#[derive(Parser, Debug, Clone, Default)]
pub struct TargetsArgs {
    /// Release table to list.
    #[arg(short, long, value_name = "FILE", env = MANIFEST_ENV)]
    pub manifest: Option<Utf8PathBuf>,

    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the pin command.
#[derive(Parser, Debug, Clone)]
pub struct PinArgs {
    /// Checksums file published with the release.
    #[arg(short, long, value_name = "FILE")]
    pub checksums: Utf8PathBuf,

    /// Release version [default: read from the checksums file name].
    #[arg(short, long, value_name = "VERSION")]
    pub release: Option<String>,

    /// Write the table here instead of standard output.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,

    /// Executable name inside the archives.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_BINARY)]
    pub binary: String,

    /// Base URL the release archives are served from.
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

impl Cli {
    /// Returns the effective install arguments.
    ///
    /// If an `Install` subcommand was provided, returns those arguments.
    /// Otherwise returns the flattened top-level arguments.
    #[must_use]
    pub fn install_args(&self) -> &InstallArgs {
        match &self.command {
            Some(Command::Install(args)) => args,
            Some(Command::Targets(_) | Command::Pin(_)) | None => &self.install,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
