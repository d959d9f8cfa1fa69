//! Tests for packager CLI parsing and configuration overrides.

use super::*;
use crate::config::DEFAULT_TOOL_TIMEOUT;
use rstest::rstest;
use std::time::Duration;

fn parse(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("rtss-overlay-package").chain(args.iter().copied()))
}

fn configured(args: &[&str]) -> PackagerConfig {
    let cli = parse(args);
    let mut config = PackagerConfig::for_project(cli.project_root());
    cli.apply_to(&mut config);
    config
}

#[test]
fn cli_parses_defaults() {
    let cli = parse(&[]);
    assert!(cli.project_root.is_none());
    assert!(cli.manifest.is_none());
    assert!(cli.include.is_empty());
    assert!(!cli.builtin_zip);
    assert!(!cli.dry_run);
    assert!(!cli.quiet);
    assert_eq!(cli.verbosity, 0);
    assert_eq!(cli.project_root(), Utf8PathBuf::from("."));
}

#[test]
fn no_flags_leave_defaults_untouched() {
    assert_eq!(
        configured(&[]),
        PackagerConfig::for_project(Utf8PathBuf::from("."))
    );
}

#[test]
fn cli_parses_project_root_short_flag() {
    let cli = parse(&["-C", "/work/plugin"]);
    assert_eq!(cli.project_root(), Utf8PathBuf::from("/work/plugin"));
}

#[test]
fn path_flags_override_config() {
    let config = configured(&[
        "--manifest",
        "meta/package.json",
        "--output-dir",
        "out",
        "--staging-dir",
        "tmp/stage",
    ]);
    assert_eq!(config.manifest, Utf8PathBuf::from("meta/package.json"));
    assert_eq!(config.output_path(), Utf8PathBuf::from("./out"));
    assert_eq!(config.staging_path(), Utf8PathBuf::from("./tmp/stage"));
}

#[test]
fn repeated_include_replaces_inclusion_list() {
    let config = configured(&["--include", "package.json", "--include", "main.py"]);
    assert_eq!(config.include_files, vec!["package.json", "main.py"]);
}

#[test]
fn builtin_zip_selects_in_process_backend() {
    assert_eq!(configured(&["--builtin-zip"]).backend, ArchiveBackend::Builtin);
}

#[test]
fn tool_flags_build_external_command() {
    let config = configured(&[
        "--archive-tool",
        "7z",
        "--archive-tool-arg",
        "a",
        "--archive-tool-arg",
        "-tzip",
        "--timeout",
        "30",
    ]);
    assert_eq!(
        config.backend,
        ArchiveBackend::External(ToolCommand {
            program: "7z".to_owned(),
            args: vec!["a".to_owned(), "-tzip".to_owned()],
            timeout: Some(Duration::from_secs(30)),
        })
    );
}

#[rstest]
#[case::disabled("0", None)]
#[case::explicit("12", Some(Duration::from_secs(12)))]
fn timeout_flag_sets_deadline(#[case] secs: &str, #[case] expected: Option<Duration>) {
    let config = configured(&["--timeout", secs]);
    let ArchiveBackend::External(command) = config.backend else {
        panic!("expected external backend");
    };
    assert_eq!(command.timeout, expected);
    assert_eq!(command.program, "zip");
}

#[test]
fn tool_flags_replace_builtin_from_config_file() {
    let cli = parse(&["--archive-tool", "zip"]);
    let mut config = PackagerConfig {
        backend: ArchiveBackend::Builtin,
        ..PackagerConfig::default()
    };
    cli.apply_to(&mut config);
    assert_eq!(
        config.backend,
        ArchiveBackend::External(ToolCommand {
            timeout: Some(DEFAULT_TOOL_TIMEOUT),
            ..ToolCommand::default()
        })
    );
}

#[test]
fn builtin_zip_conflicts_with_tool_flags() {
    let result = Cli::try_parse_from(["rtss-overlay-package", "--builtin-zip", "--archive-tool", "7z"]);
    assert!(result.is_err());
}

#[test]
fn quiet_conflicts_with_verbose() {
    let result = Cli::try_parse_from(["rtss-overlay-package", "-q", "-v"]);
    assert!(result.is_err());
}

#[rstest]
#[case::default(&[], "warn")]
#[case::info(&["-v"], "info")]
#[case::debug(&["-vv"], "debug")]
#[case::trace(&["-vvv"], "trace")]
fn verbosity_maps_to_log_level(#[case] args: &[&str], #[case] expected: &str) {
    assert_eq!(parse(args).log_level(), expected);
}
