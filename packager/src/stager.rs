//! Staging of plugin files into a transient working tree.
//!
//! The staging root holds exactly one subdirectory named after the plugin.
//! Its contents are what ends up inside the archive, so the archive's
//! top-level entry is that subdirectory and never the staging root itself.

use crate::error::{PackagerError, Result};
use crate::manifest::PluginName;
use crate::naming::is_archive_file_name;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, trace, warn};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Files considered for staging, split by whether they were present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedFiles {
    /// Inclusion-list entries that were copied.
    pub copied: Vec<String>,
    /// Inclusion-list entries absent from the project root.
    pub skipped: Vec<String>,
}

/// Builds the staged plugin tree under a staging root.
#[derive(Debug, Clone)]
pub struct Stager {
    staging_root: Utf8PathBuf,
    plugin_name: PluginName,
}

impl Stager {
    /// Create a stager for `plugin_name` rooted at `staging_root`.
    #[must_use]
    pub fn new(staging_root: Utf8PathBuf, plugin_name: PluginName) -> Self {
        Self {
            staging_root,
            plugin_name,
        }
    }

    /// Return the staging root.
    #[must_use]
    pub fn staging_root(&self) -> &Utf8Path {
        &self.staging_root
    }

    /// Return the staged plugin directory, `<staging_root>/<name>`.
    #[must_use]
    pub fn plugin_dir(&self) -> Utf8PathBuf {
        self.staging_root.join(self.plugin_name.as_str())
    }

    /// Return a guard that removes the staging root when dropped.
    #[must_use]
    pub fn guard(&self) -> StagingGuard {
        StagingGuard::new(self.staging_root.clone())
    }

    /// Recreate the staging root and the empty plugin directory.
    ///
    /// Any tree left over from an earlier run is removed first.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::StagingIo`] if the old tree cannot be removed
    /// or the new directories cannot be created.
    pub fn prepare(&self) -> Result<()> {
        if self.staging_root.exists() {
            debug!("removing stale staging directory {}", self.staging_root);
            fs::remove_dir_all(&self.staging_root)
                .map_err(|e| PackagerError::staging(&self.staging_root, e))?;
        }
        let plugin_dir = self.plugin_dir();
        fs::create_dir_all(&plugin_dir).map_err(|e| PackagerError::staging(&plugin_dir, e))
    }

    /// Copy each inclusion-list file present in `project_root` into the
    /// plugin directory, preserving filenames and order.
    ///
    /// Missing files are skipped, not reported as errors.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::StagingIo`] if a present file cannot be copied.
    pub fn stage_files(&self, project_root: &Utf8Path, files: &[String]) -> Result<StagedFiles> {
        let plugin_dir = self.plugin_dir();
        let mut staged = StagedFiles::default();

        for file in files {
            let source = project_root.join(file);
            if !source.is_file() {
                trace!("skipping absent file {source}");
                staged.skipped.push(file.clone());
                continue;
            }
            let dest = plugin_dir.join(file);
            fs::copy(&source, &dest).map_err(|e| PackagerError::staging(&source, e))?;
            staged.copied.push(file.clone());
        }

        Ok(staged)
    }

    /// Recursively copy the build-output directory into a same-named
    /// subdirectory of the plugin directory.
    ///
    /// Returns `false` without copying when `source` does not exist.
    /// Archives at the top level of `source` are left out because the
    /// build-output directory also receives the produced archive. Symbolic
    /// links are recreated as links, never followed.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::StagingIo`] if `source` has no final path
    /// component or any entry cannot be copied.
    pub fn stage_build_output(&self, source: &Utf8Path) -> Result<bool> {
        if !source.is_dir() {
            debug!("build-output directory {source} not found; skipping");
            return Ok(false);
        }
        let Some(dir_name) = source.file_name() else {
            return Err(PackagerError::staging(
                source,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "build-output path has no directory name",
                ),
            ));
        };
        let dest = self.plugin_dir().join(dir_name);
        fs::create_dir_all(&dest).map_err(|e| PackagerError::staging(&dest, e))?;

        let walker = WalkDir::new(source)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.should_stage(entry));
        for entry in walker {
            let entry = entry.map_err(|e| walk_error(source, e))?;
            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|e| PackagerError::staging(source, io::Error::other(e)))?;
            copy_entry(&entry, &dest.as_std_path().join(relative))?;
        }
        Ok(true)
    }

    /// Remove the staging root and everything below it.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::StagingIo`] if removal fails.
    pub fn cleanup(&self) -> Result<()> {
        remove_tree(&self.staging_root).map_err(|e| PackagerError::staging(&self.staging_root, e))
    }

    fn should_stage(&self, entry: &DirEntry) -> bool {
        // A staging root nested inside the copied tree would recurse forever.
        if entry.path() == self.staging_root.as_std_path() {
            return false;
        }
        let previous_archive = entry.depth() == 1
            && entry.file_type().is_file()
            && entry.file_name().to_str().is_some_and(is_archive_file_name);
        if previous_archive {
            trace!(
                "leaving previous archive {} out of the staged tree",
                entry.path().display()
            );
        }
        !previous_archive
    }
}

fn copy_entry(entry: &DirEntry, target: &Path) -> Result<()> {
    let source = entry.path();
    let file_type = entry.file_type();
    let copied = if file_type.is_dir() {
        fs::create_dir_all(target)
    } else if file_type.is_symlink() {
        copy_symlink(source, target)
    } else {
        fs::copy(source, target).map(drop)
    };
    copied.map_err(|e| PackagerError::staging(display_path(source), e))
}

#[cfg(unix)]
fn copy_symlink(source: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(source)?, target)
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, _target: &Path) -> io::Result<()> {
    warn!("skipping symbolic link {}", source.display());
    Ok(())
}

fn walk_error(root: &Utf8Path, err: walkdir::Error) -> PackagerError {
    let path = err.path().map_or_else(|| root.to_owned(), display_path);
    PackagerError::staging(path, err.into())
}

fn display_path(path: &Path) -> Utf8PathBuf {
    Utf8PathBuf::from(path.to_string_lossy().into_owned())
}

/// Removes the staging root when dropped, on success and failure alike.
#[derive(Debug)]
pub struct StagingGuard {
    path: Utf8PathBuf,
}

impl StagingGuard {
    /// Guard the directory at `path`.
    #[must_use]
    pub fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }

    /// Return the guarded path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for StagingGuard {
    fn drop(&mut self) {
        if let Err(e) = remove_tree(&self.path) {
            warn!("failed to remove staging directory {}: {e}", self.path);
        }
    }
}

fn remove_tree(path: &Utf8Path) -> std::io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
