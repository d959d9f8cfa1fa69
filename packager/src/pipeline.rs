//! Packaging pipeline orchestration.
//!
//! A run is one straight line: load the manifest, derive the archive name,
//! stage the plugin tree, prepare the output directory, archive, clean up,
//! report. The staging directory is removed on every exit path.

use crate::archive::{ArchiveReport, ArchiveRequest, Archiver};
use crate::config::PackagerConfig;
use crate::error::Result;
use crate::manifest::PluginManifest;
use crate::naming::ArchiveName;
use crate::output::{ensure_output_dir, stale_archives, sweep_stale_archives, write_stderr_line};
use crate::stager::{StagedFiles, Stager};
use camino::Utf8PathBuf;
use log::info;
use std::fmt::Display;
use std::io::Write;

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct PackageOutput {
    /// Path of the produced archive.
    pub archive_path: Utf8PathBuf,
    /// Manifest the archive was named from.
    pub manifest: PluginManifest,
    /// Inclusion-list files that were copied or skipped.
    pub staged: StagedFiles,
    /// Whether the build-output directory existed and was copied.
    pub build_output_included: bool,
    /// Archives removed from the output directory before writing.
    pub removed_archives: Vec<Utf8PathBuf>,
    /// Captured output of the archiving backend.
    pub report: ArchiveReport,
}

/// What a run would do, computed without touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePlan {
    /// Manifest the archive would be named from.
    pub manifest: PluginManifest,
    /// Path the archive would be written to.
    pub archive_path: Utf8PathBuf,
    /// Staged plugin directory.
    pub plugin_dir: Utf8PathBuf,
    /// Inclusion-list files present in the project root.
    pub included: Vec<String>,
    /// Inclusion-list files absent from the project root.
    pub missing: Vec<String>,
    /// Whether the build-output directory exists.
    pub build_output_present: bool,
    /// Archives that would be swept from the output directory.
    pub stale_archives: Vec<Utf8PathBuf>,
    /// Label of the archiving backend.
    pub backend: String,
}

impl PackagePlan {
    /// Format the plan for display to the user.
    #[must_use]
    pub fn display_text(&self) -> String {
        let mut lines = vec![
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!(
                "Plugin: {} {}",
                self.manifest.name(),
                self.manifest.version()
            ),
            format!("Archive: {}", self.archive_path),
            format!("Staging directory: {}", self.plugin_dir),
            format!("Archiver: {}", self.backend),
            String::new(),
            "Files to include:".to_owned(),
        ];
        lines.extend(self.included.iter().map(|f| format!("  - {f}")));
        if !self.missing.is_empty() {
            lines.push("Files not found (skipped):".to_owned());
            lines.extend(self.missing.iter().map(|f| format!("  - {f}")));
        }
        lines.push(format!(
            "Build output: {}",
            if self.build_output_present {
                "included"
            } else {
                "not found (skipped)"
            }
        ));
        if !self.stale_archives.is_empty() {
            lines.push("Archives to remove:".to_owned());
            lines.extend(self.stale_archives.iter().map(|p| format!("  - {p}")));
        }
        lines.join("\n")
    }
}

/// Runs the packaging pipeline for one configuration.
pub struct Packager<'a> {
    config: &'a PackagerConfig,
    archiver: &'a dyn Archiver,
    quiet: bool,
}

impl<'a> Packager<'a> {
    /// Create a packager for `config` using `archiver`.
    #[must_use]
    pub fn new(config: &'a PackagerConfig, archiver: &'a dyn Archiver) -> Self {
        Self {
            config,
            archiver,
            quiet: false,
        }
    }

    /// Suppress progress output.
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Compute the plan for a run without modifying anything.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PackagerError::Config`] if the staging
    /// directory overlaps the project's inputs, a manifest error if the
    /// manifest cannot be loaded, or [`crate::error::PackagerError::OutputIo`]
    /// if the output directory exists but cannot be listed.
    pub fn plan(&self) -> Result<PackagePlan> {
        self.config.validate()?;
        let manifest = PluginManifest::load(&self.config.manifest_path())?;
        let archive_name = ArchiveName::for_manifest(&manifest);
        let output_dir = self.config.output_path();
        let stager = Stager::new(self.config.staging_path(), manifest.name().clone());

        let (included, missing): (Vec<String>, Vec<String>) = self
            .config
            .include_files
            .iter()
            .cloned()
            .partition(|f| self.config.project_root.join(f).is_file());

        Ok(PackagePlan {
            archive_path: output_dir.join(archive_name.filename()),
            plugin_dir: stager.plugin_dir(),
            included,
            missing,
            build_output_present: output_dir.is_dir(),
            stale_archives: stale_archives(&output_dir)?,
            backend: self.archiver.label(),
            manifest,
        })
    }

    /// Run the pipeline and return what it produced.
    ///
    /// Progress lines and the archiving tool's captured output are written
    /// to `stderr` unless the packager is quiet.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; no step is retried. An unsafe
    /// staging directory is rejected before anything is touched; after that
    /// the staging directory is removed before the error is returned.
    pub fn run(&self, stderr: &mut dyn Write) -> Result<PackageOutput> {
        self.config.validate()?;
        let manifest = PluginManifest::load(&self.config.manifest_path())?;
        let archive_name = ArchiveName::for_manifest(&manifest);
        let output_dir = self.config.output_path();
        let archive_path = output_dir.join(archive_name.filename());

        let stager = Stager::new(self.config.staging_path(), manifest.name().clone());
        let _guard = stager.guard();

        self.progress(
            stderr,
            format!("Staging {} into {}...", manifest.name(), stager.plugin_dir()),
        );
        stager.prepare()?;
        let staged = stager.stage_files(&self.config.project_root, &self.config.include_files)?;
        let build_output_included = stager.stage_build_output(&output_dir)?;
        info!(
            "staged {} file(s), skipped {}, build output {}",
            staged.copied.len(),
            staged.skipped.len(),
            if build_output_included { "included" } else { "absent" }
        );

        ensure_output_dir(&output_dir)?;
        let removed_archives = sweep_stale_archives(&output_dir)?;

        self.progress(stderr, format!("Archiving with {}...", self.archiver.label()));
        let report = self.archiver.archive(&ArchiveRequest {
            staging_root: stager.staging_root().to_owned(),
            plugin_dir_name: manifest.name().to_string(),
            archive_path: archive_path.clone(),
        })?;
        self.forward_tool_output(stderr, &report);

        stager.cleanup()?;

        Ok(PackageOutput {
            archive_path,
            manifest,
            staged,
            build_output_included,
            removed_archives,
            report,
        })
    }

    fn progress(&self, stderr: &mut dyn Write, message: impl Display) {
        if !self.quiet {
            write_stderr_line(stderr, message);
        }
    }

    fn forward_tool_output(&self, stderr: &mut dyn Write, report: &ArchiveReport) {
        if self.quiet {
            return;
        }
        for stream in [&report.stdout, &report.stderr] {
            let text = stream.trim_end();
            if !text.is_empty() {
                write_stderr_line(stderr, text);
            }
        }
    }
}

/// Run the pipeline for `config` without progress output.
///
/// # Errors
///
/// See [`Packager::run`].
pub fn package(config: &PackagerConfig, archiver: &dyn Archiver) -> Result<PackageOutput> {
    Packager::new(config, archiver)
        .quiet(true)
        .run(&mut std::io::sink())
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
