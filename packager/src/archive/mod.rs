//! Archive backends.
//!
//! An [`Archiver`] compresses the staged plugin directory into a single
//! archive whose top-level entry is that directory.
//!
//! # Sub-modules
//!
//! - [`builtin`] - In-process writer built on the `zip` crate.
//! - [`external`] - Command-line tool run through a [`CommandExecutor`].
//!
//! [`CommandExecutor`]: crate::executor::CommandExecutor

pub mod builtin;
pub mod external;

use crate::config::ArchiveBackend;
use crate::error::Result;
use crate::executor::SystemCommandExecutor;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

pub use builtin::ZipArchiver;
pub use external::ExternalArchiver;

/// What to archive and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    /// Directory containing the staged plugin directory.
    pub staging_root: Utf8PathBuf,
    /// Name of the staged plugin directory inside `staging_root`.
    pub plugin_dir_name: String,
    /// Destination archive path; absolute, or relative to the caller's
    /// working directory.
    pub archive_path: Utf8PathBuf,
}

/// Result of a successful archiving step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Captured standard output of the tool, if any.
    pub stdout: String,
    /// Captured standard error of the tool, if any.
    pub stderr: String,
}

/// Compresses a staged plugin directory into an archive.
#[cfg_attr(test, mockall::automock)]
pub trait Archiver {
    /// Short label identifying the backend in logs and errors.
    fn label(&self) -> String;

    /// Write the archive described by `request`.
    ///
    /// On failure no archive is left at `request.archive_path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PackagerError::ArchiveTool`] if archiving fails.
    fn archive(&self, request: &ArchiveRequest) -> Result<ArchiveReport>;
}

/// Build the archiver selected by `backend`.
#[must_use]
pub fn archiver_for(backend: &ArchiveBackend) -> Box<dyn Archiver> {
    match backend {
        ArchiveBackend::External(command) => {
            Box::new(ExternalArchiver::new(command.clone(), SystemCommandExecutor))
        }
        ArchiveBackend::Builtin => Box::new(ZipArchiver),
    }
}

/// Remove a partially written archive, ignoring a missing file.
pub(crate) fn discard_partial(archive_path: &Utf8Path) {
    if archive_path.exists() {
        log::debug!("removing partial archive {archive_path}");
        if let Err(e) = fs::remove_file(archive_path) {
            log::warn!("failed to remove partial archive {archive_path}: {e}");
        }
    }
}
