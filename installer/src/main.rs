//! azguard installer CLI entrypoint.
//!
//! This binary installs the prebuilt azguard executable for the running host
//! from a pinned release table. It can also list the table's targets and pin
//! a new table from a release's checksums file.

use azguard_installer::cli::{Cli, Command, InstallArgs};
use azguard_installer::dirs::{BaseDirs, SystemBaseDirs, resolve_bin_dir};
use azguard_installer::error::Result;
use azguard_installer::output::{
    DryRunInfo, is_directory_in_path, path_instructions, success_message, write_stderr_line,
};
use azguard_installer::pin::run_pin;
use azguard_installer::pipeline::{InstallOutcome, InstallRequest, run_install};
use azguard_installer::release::source::load_release_table;
use azguard_installer::release::version::ReleaseVersion;
use azguard_installer::targets::run_targets;
use clap::Parser;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.install_args());
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Installs `env_logger`; `RUST_LOG` overrides the flag-derived default.
fn init_logging(args: &InstallArgs) {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(log_filter(args)));
}

fn log_filter(args: &InstallArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let dirs = SystemBaseDirs::new();
    match &cli.command {
        Some(Command::Targets(args)) => run_targets(args, &dirs, stdout),
        Some(Command::Pin(args)) => run_pin(args, stdout, stderr),
        Some(Command::Install(_)) | None => install(cli.install_args(), &dirs, stderr),
    }
}

/// Loads the release table, resolves the bin directory, and runs the pipeline.
fn install(args: &InstallArgs, dirs: &dyn BaseDirs, stderr: &mut dyn Write) -> Result<()> {
    let (table, source) = load_release_table(args.manifest.as_deref(), dirs)?;
    let version = args
        .release
        .as_deref()
        .map(ReleaseVersion::try_from)
        .transpose()?;
    let bin_dir = resolve_bin_dir(args.bin_dir.as_deref(), dirs)?;

    let request = InstallRequest {
        table: &table,
        version: version.as_ref(),
        bin_dir: &bin_dir,
        dry_run: args.dry_run,
        quiet: args.quiet,
    };

    match run_install(&request, stderr)? {
        InstallOutcome::DryRun {
            target,
            destination,
        } => {
            let info = DryRunInfo {
                table_source: &source.to_string(),
                target: &target,
                destination: &destination,
            };
            write_stderr_line(stderr, info.display_text());
        }
        InstallOutcome::Installed {
            path,
            version_output,
            ..
        } => {
            if !args.quiet {
                write_stderr_line(stderr, "");
                write_stderr_line(stderr, success_message(&path, &version_output));
                if !is_directory_in_path(bin_dir.as_std_path()) {
                    write_stderr_line(stderr, path_instructions(&bin_dir));
                }
            }
        }
    }
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}
