//! RTSS Overlay plugin packager CLI entrypoint.
//!
//! This binary stages the plugin's files, archives them into
//! `<name>-v<version>.zip` inside the build-output directory, and prints the
//! archive path on success.

use clap::Parser;
use rtss_overlay_packager::archive::archiver_for;
use rtss_overlay_packager::cli::Cli;
use rtss_overlay_packager::config::PackagerConfig;
use rtss_overlay_packager::error::{PackagerError, Result};
use rtss_overlay_packager::output::{success_message, write_stderr_line};
use rtss_overlay_packager::pipeline::Packager;
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "RTSS_OVERLAY_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Install the stderr log subscriber; `log` records are bridged into it.
fn init_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        // A subscriber is already installed; keep it.
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let config = resolve_config(cli)?;
    let archiver = archiver_for(&config.backend);
    let packager = Packager::new(&config, archiver.as_ref()).quiet(cli.quiet);

    if cli.dry_run {
        let plan = packager.plan()?;
        write_stderr_line(stderr, plan.display_text());
        return Ok(());
    }

    let output = packager.run(stderr)?;
    writeln!(stdout, "{}", success_message(&output.archive_path))
        .map_err(|source| PackagerError::WriteFailed { source })
}

/// Defaults, then `packager.toml`, then command-line flags.
fn resolve_config(cli: &Cli) -> Result<PackagerConfig> {
    let mut config = PackagerConfig::load(&cli.project_root())?;
    cli.apply_to(&mut config);
    Ok(config)
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
