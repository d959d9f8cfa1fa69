//! Output directory preparation and console reporting.
//!
//! The build-output directory doubles as the archive destination. Before a
//! new archive is written every existing archive in it is swept, whatever its
//! name, so that a successful run leaves exactly one archive behind.

use crate::error::{PackagerError, Result};
use crate::naming::is_archive_file_name;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::fmt::Display;
use std::fs;
use std::io::Write;

/// Create the output directory if it does not already exist.
///
/// # Errors
///
/// Returns [`PackagerError::OutputIo`] if the directory cannot be created.
pub fn ensure_output_dir(dir: &Utf8Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| PackagerError::output(dir, e))
}

/// List the archives directly inside `dir` without removing them.
///
/// A missing directory yields an empty list.
///
/// # Errors
///
/// Returns [`PackagerError::OutputIo`] if the directory cannot be read.
pub fn stale_archives(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut archives = Vec::new();
    for entry in dir.read_dir_utf8().map_err(|e| PackagerError::output(dir, e))? {
        let entry = entry.map_err(|e| PackagerError::output(dir, e))?;
        let is_file = entry
            .file_type()
            .map_err(|e| PackagerError::output(entry.path(), e))?
            .is_file();
        if is_file && is_archive_file_name(entry.file_name()) {
            archives.push(entry.into_path());
        }
    }
    archives.sort();
    Ok(archives)
}

/// Delete every archive directly inside `dir` and return the removed paths.
///
/// Non-archive files and subdirectories are left untouched.
///
/// # Errors
///
/// Returns [`PackagerError::OutputIo`] if the directory cannot be read or an
/// archive cannot be removed.
pub fn sweep_stale_archives(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let archives = stale_archives(dir)?;
    for archive in &archives {
        debug!("removing stale archive {archive}");
        fs::remove_file(archive).map_err(|e| PackagerError::output(archive, e))?;
    }
    if !archives.is_empty() {
        info!("removed {} stale archive(s) from {dir}", archives.len());
    }
    Ok(archives)
}

/// Format the confirmation line printed after a successful run.
#[must_use]
pub fn success_message(archive_path: &Utf8Path) -> String {
    format!("Created {archive_path}")
}

/// Write a line to the given writer, ignoring failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort progress output; ignore write failures.
    }
}
