//! Packager configuration.
//!
//! [`PackagerConfig`] replaces the fixed relative paths of a packaging script
//! with an explicit value. Defaults match the plugin's conventional layout.
//! An optional `packager.toml` in the project root may override them, and
//! CLI flags override both.

use crate::error::{PackagerError, Result};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fs;
use std::time::Duration;

/// Name of the optional configuration file in the project root.
pub const CONFIG_FILE_NAME: &str = "packager.toml";

/// Default manifest path relative to the project root.
pub const DEFAULT_MANIFEST: &str = "package.json";

/// Default build-output directory relative to the project root.
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

/// Default staging directory relative to the project root.
pub const DEFAULT_STAGING_DIR: &str = "temp_dist";

/// Root-relative files copied into the artefact when present.
pub const DEFAULT_INCLUDE_FILES: [&str; 5] =
    ["package.json", "plugin.json", "main.py", "README.md", "LICENSE"];

/// Default external archiving program.
pub const DEFAULT_ARCHIVE_PROGRAM: &str = "zip";

/// Default leading arguments passed to the archiving program.
pub const DEFAULT_ARCHIVE_ARGS: [&str; 2] = ["-r", "-q"];

/// Default deadline for the external archiving tool.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(300);

/// How the staged tree is turned into an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveBackend {
    /// Run an external command-line tool.
    External(ToolCommand),
    /// Write the archive in-process.
    Builtin,
}

impl Default for ArchiveBackend {
    fn default() -> Self {
        Self::External(ToolCommand::default())
    }
}

/// An external archiving command.
///
/// The archive path and the staged directory name are appended after
/// `args` when the tool runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Program to execute.
    pub program: String,
    /// Leading arguments placed before the two positional arguments.
    pub args: Vec<String>,
    /// Deadline for the tool; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ToolCommand {
    fn default() -> Self {
        Self {
            program: DEFAULT_ARCHIVE_PROGRAM.to_owned(),
            args: DEFAULT_ARCHIVE_ARGS.iter().map(|&a| a.to_owned()).collect(),
            timeout: Some(DEFAULT_TOOL_TIMEOUT),
        }
    }
}

/// Complete configuration for one packaging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagerConfig {
    /// Directory all other paths are resolved against.
    pub project_root: Utf8PathBuf,
    /// Manifest path, relative to the project root.
    pub manifest: Utf8PathBuf,
    /// Ordered, optional files copied into the artefact.
    pub include_files: Vec<String>,
    /// Build-output directory, also the archive destination.
    pub output_dir: Utf8PathBuf,
    /// Transient staging directory.
    pub staging_dir: Utf8PathBuf,
    /// Archive backend.
    pub backend: ArchiveBackend,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self::for_project(Utf8PathBuf::from("."))
    }
}

impl PackagerConfig {
    /// Create a configuration with default paths under `project_root`.
    #[must_use]
    pub fn for_project(project_root: Utf8PathBuf) -> Self {
        Self {
            project_root,
            manifest: Utf8PathBuf::from(DEFAULT_MANIFEST),
            include_files: DEFAULT_INCLUDE_FILES
                .iter()
                .map(|&f| f.to_owned())
                .collect(),
            output_dir: Utf8PathBuf::from(DEFAULT_OUTPUT_DIR),
            staging_dir: Utf8PathBuf::from(DEFAULT_STAGING_DIR),
            backend: ArchiveBackend::default(),
        }
    }

    /// Load defaults for `project_root`, overlaid by its `packager.toml`.
    ///
    /// A missing configuration file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Config`] if the file exists but cannot be
    /// read or parsed.
    pub fn load(project_root: &Utf8Path) -> Result<Self> {
        let mut config = Self::for_project(project_root.to_owned());
        let path = project_root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(config);
        }

        let contents = fs::read_to_string(&path).map_err(|e| PackagerError::Config {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let file = parse_config_file(&contents).map_err(|e| PackagerError::Config {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        log::debug!("applying configuration from {path}");
        config.apply(file);
        Ok(config)
    }

    /// Apply the overrides from a parsed configuration file.
    pub fn apply(&mut self, file: FileConfig) {
        if let Some(manifest) = file.manifest {
            self.manifest = manifest;
        }
        if let Some(include) = file.include {
            self.include_files = include;
        }
        if let Some(output_dir) = file.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(staging_dir) = file.staging_dir {
            self.staging_dir = staging_dir;
        }
        file.archive.apply_to(&mut self.backend);
    }

    /// Absolute or root-joined manifest path.
    #[must_use]
    pub fn manifest_path(&self) -> Utf8PathBuf {
        self.project_root.join(&self.manifest)
    }

    /// Absolute or root-joined build-output directory.
    #[must_use]
    pub fn output_path(&self) -> Utf8PathBuf {
        self.project_root.join(&self.output_dir)
    }

    /// Absolute or root-joined staging directory.
    #[must_use]
    pub fn staging_path(&self) -> Utf8PathBuf {
        self.project_root.join(&self.staging_dir)
    }

    /// Check that the staging directory is safe to delete and recreate.
    ///
    /// The staging tree is removed wholesale at the start and end of every
    /// run, so it must not be or contain the project root, the manifest, or
    /// the build-output directory.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Config`] naming the staging path when it
    /// would remove any of those paths, or when the paths cannot be resolved.
    pub fn validate(&self) -> Result<()> {
        let staging_path = self.staging_path();
        let invalid = |reason: String| PackagerError::Config {
            path: staging_path.clone(),
            reason,
        };

        let staging = resolve(&staging_path).map_err(&invalid)?;
        let root = resolve(&self.project_root).map_err(&invalid)?;
        let manifest = resolve(&self.manifest_path()).map_err(&invalid)?;
        let output = resolve(&self.output_path()).map_err(&invalid)?;

        if root.starts_with(&staging) {
            return Err(invalid(format!(
                "staging directory would remove the project root {}",
                self.project_root
            )));
        }
        if manifest.starts_with(&staging) {
            return Err(invalid(format!(
                "staging directory would remove the manifest {}",
                self.manifest_path()
            )));
        }
        if output.starts_with(&staging) {
            return Err(invalid(format!(
                "staging directory would remove the build-output directory {}",
                self.output_path()
            )));
        }
        Ok(())
    }
}

/// Make `path` absolute and fold `.` and `..` components lexically.
///
/// Symlinks are not resolved, so the path need not exist.
fn resolve(path: &Utf8Path) -> std::result::Result<Utf8PathBuf, String> {
    let absolute = std::path::absolute(path).map_err(|e| e.to_string())?;
    let absolute = Utf8PathBuf::try_from(absolute).map_err(|e| e.to_string())?;
    let mut resolved = Utf8PathBuf::new();
    for component in absolute.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_str()),
        }
    }
    Ok(resolved)
}

/// Overrides read from `packager.toml`.
///
/// ```toml
/// manifest = "package.json"
/// include = ["package.json", "plugin.json", "main.py"]
/// output_dir = "dist"
/// staging_dir = "temp_dist"
///
/// [archive]
/// builtin = false
/// program = "zip"
/// args = ["-r", "-q"]
/// timeout_secs = 300
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Manifest path override.
    pub manifest: Option<Utf8PathBuf>,
    /// Replacement inclusion list.
    pub include: Option<Vec<String>>,
    /// Build-output directory override.
    pub output_dir: Option<Utf8PathBuf>,
    /// Staging directory override.
    pub staging_dir: Option<Utf8PathBuf>,
    /// Archive backend overrides.
    pub archive: ArchiveFileConfig,
}

/// The `[archive]` table of `packager.toml`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveFileConfig {
    /// Use the in-process zip writer instead of an external tool.
    pub builtin: Option<bool>,
    /// External program override.
    pub program: Option<String>,
    /// Leading arguments override.
    pub args: Option<Vec<String>>,
    /// Tool timeout in seconds; `0` disables the deadline.
    pub timeout_secs: Option<u64>,
}

impl ArchiveFileConfig {
    fn apply_to(self, backend: &mut ArchiveBackend) {
        if self.builtin == Some(true) {
            *backend = ArchiveBackend::Builtin;
            return;
        }
        if self.builtin.is_none()
            && self.program.is_none()
            && self.args.is_none()
            && self.timeout_secs.is_none()
        {
            return;
        }
        let mut command = match backend {
            ArchiveBackend::External(command) => command.clone(),
            ArchiveBackend::Builtin => ToolCommand::default(),
        };
        if let Some(program) = self.program {
            command.program = program;
        }
        if let Some(args) = self.args {
            command.args = args;
        }
        if let Some(secs) = self.timeout_secs {
            command.timeout = timeout_from_secs(secs);
        }
        *backend = ArchiveBackend::External(command);
    }
}

/// Convert a timeout in seconds, treating `0` as no deadline.
#[must_use]
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Parse `packager.toml` contents.
///
/// # Errors
///
/// Returns the TOML error for malformed input or unknown keys.
pub fn parse_config_file(contents: &str) -> std::result::Result<FileConfig, toml::de::Error> {
    toml::from_str(contents)
}
