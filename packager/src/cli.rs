//! CLI argument definitions for the plugin packager.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::config::{ArchiveBackend, PackagerConfig, ToolCommand, timeout_from_secs};
use camino::Utf8PathBuf;
use clap::Parser;

/// Package the RTSS Overlay plugin into a distributable zip archive.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "rtss-overlay-package")]
#[command(version, about)]
#[command(long_about = concat!(
    "Package the RTSS Overlay plugin into a distributable zip archive.\n\n",
    "The archive is named <name>-v<version>.zip from the project manifest and ",
    "written into the build-output directory. Its single top-level entry is a ",
    "directory named after the plugin, as the plugin loader expects.\n\n",
    "Settings are read from packager.toml in the project root when present; ",
    "flags given here take precedence.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Package the project in the current directory:\n",
    "    $ rtss-overlay-package\n\n",
    "  Package without an external zip tool:\n",
    "    $ rtss-overlay-package --builtin-zip\n\n",
    "  Preview what would be archived:\n",
    "    $ rtss-overlay-package --dry-run\n\n",
    "Set RTSS_OVERLAY_LOG=debug for diagnostic logging.",
))]
pub struct Cli {
    /// Project root containing the manifest [default: current directory].
    #[arg(short = 'C', long, value_name = "DIR")]
    pub project_root: Option<Utf8PathBuf>,

    /// Manifest path relative to the project root.
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<Utf8PathBuf>,

    /// Build-output directory, also where the archive is written.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<Utf8PathBuf>,

    /// Transient staging directory.
    #[arg(long, value_name = "DIR")]
    pub staging_dir: Option<Utf8PathBuf>,

    /// File to include in the archive (repeatable; replaces the default list).
    #[arg(long = "include", value_name = "FILE")]
    pub include: Vec<String>,

    /// External archiving program.
    #[arg(long, value_name = "PROGRAM", conflicts_with = "builtin_zip")]
    pub archive_tool: Option<String>,

    /// Leading argument for the archiving program (repeatable).
    #[arg(
        long = "archive-tool-arg",
        value_name = "ARG",
        allow_hyphen_values = true,
        conflicts_with = "builtin_zip"
    )]
    pub archive_tool_args: Vec<String>,

    /// Write the archive in-process instead of running an external tool.
    #[arg(long)]
    pub builtin_zip: bool,

    /// Deadline for the archiving program in seconds (0 disables it).
    #[arg(long, value_name = "SECS", conflicts_with = "builtin_zip")]
    pub timeout: Option<u64>,

    /// Show what would be packaged and exit without modifying anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Return the project root, defaulting to the current directory.
    #[must_use]
    pub fn project_root(&self) -> Utf8PathBuf {
        self.project_root
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from("."))
    }

    /// Return the default log filter directive for the verbosity level.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtss_overlay_packager::cli::Cli;
    ///
    /// assert_eq!(Cli::default().log_level(), "warn");
    /// let cli = Cli { verbosity: 2, ..Cli::default() };
    /// assert_eq!(cli.log_level(), "debug");
    /// ```
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Apply command-line overrides on top of `config`.
    ///
    /// Flags that were not given leave the configuration untouched.
    pub fn apply_to(&self, config: &mut PackagerConfig) {
        if let Some(manifest) = &self.manifest {
            config.manifest.clone_from(manifest);
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir.clone_from(output_dir);
        }
        if let Some(staging_dir) = &self.staging_dir {
            config.staging_dir.clone_from(staging_dir);
        }
        if !self.include.is_empty() {
            config.include_files.clone_from(&self.include);
        }

        if self.builtin_zip {
            config.backend = ArchiveBackend::Builtin;
            return;
        }
        if !self.overrides_tool() {
            return;
        }
        let mut command = match &config.backend {
            ArchiveBackend::External(command) => command.clone(),
            ArchiveBackend::Builtin => ToolCommand::default(),
        };
        if let Some(program) = &self.archive_tool {
            command.program.clone_from(program);
        }
        if !self.archive_tool_args.is_empty() {
            command.args.clone_from(&self.archive_tool_args);
        }
        if let Some(secs) = self.timeout {
            command.timeout = timeout_from_secs(secs);
        }
        config.backend = ArchiveBackend::External(command);
    }

    fn overrides_tool(&self) -> bool {
        self.archive_tool.is_some() || !self.archive_tool_args.is_empty() || self.timeout.is_some()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
