//! Output formatting for the installer CLI.
//!
//! Progress, success, and dry-run text written to standard error, plus the
//! hint shown when the bin directory is not on `PATH`.

use crate::release::target::ReleaseTarget;
use camino::Utf8Path;
use std::io::Write;
use std::path::Path;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Format the message shown after a successful install.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use azguard_installer::output::success_message;
///
/// let msg = success_message(Utf8Path::new("/home/user/.local/bin/azguard"), "azguard 1.0.0");
/// assert_eq!(msg, "Installed /home/user/.local/bin/azguard (azguard 1.0.0)");
/// ```
#[must_use]
pub fn success_message(path: &Utf8Path, version_output: &str) -> String {
    if version_output.is_empty() {
        format!("Installed {path}")
    } else {
        format!("Installed {path} ({version_output})")
    }
}

/// Whether `dir` appears in the `PATH` environment variable.
#[must_use]
pub fn is_directory_in_path(dir: &Path) -> bool {
    std::env::var_os("PATH").is_some_and(|path| std::env::split_paths(&path).any(|p| p == dir))
}

/// Instructions for adding `bin_dir` to `PATH`.
#[must_use]
pub fn path_instructions(bin_dir: &Utf8Path) -> String {
    format!(
        concat!(
            "{} is not on your PATH. Add the following to your shell profile ",
            "(~/.bashrc or ~/.zshrc):\n",
            "  export PATH=\"{}:$PATH\""
        ),
        bin_dir, bin_dir
    )
}

/// Everything a dry run reports.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use azguard_installer::output::DryRunInfo;
/// use azguard_installer::release::table::ReleaseTable;
///
/// let toml = format!("version = \"1.0.0\"\n[targets.linux-amd64]\nsha256 = \"{}\"\n", "ab".repeat(32));
/// let table = ReleaseTable::parse(&toml, "example").expect("valid table");
/// let target = table
///     .resolve_target("linux-amd64".parse().expect("platform"), table.version())
///     .expect("target");
///
/// let info = DryRunInfo {
///     table_source: "example",
///     target: &target,
///     destination: Utf8Path::new("/home/user/.local/bin/azguard"),
/// };
/// let output = info.display_text();
/// assert!(output.contains("Dry run"));
/// assert!(output.contains("linux-amd64"));
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Where the release table came from.
    pub table_source: &'a str,
    /// The resolved download.
    pub target: &'a ReleaseTarget,
    /// Where the executable would be placed.
    pub destination: &'a Utf8Path,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        [
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!("Release table: {}", self.table_source),
            format!("Platform: {}", self.target.platform()),
            format!("Version: {}", self.target.version()),
            format!("Archive: {}", self.target.url()),
            format!("SHA-256: {}", self.target.expected_checksum()),
            format!("Install path: {}", self.destination),
        ]
        .join("\n")
    }
}
