//! Archive naming policy.
//!
//! Archives are named `<name>-v<version>.zip`, with the version embedded
//! verbatim.

use crate::manifest::{PluginManifest, PluginName, PluginVersion};
use std::fmt;

/// The file extension shared by produced and stale archives.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// A deterministic archive filename derived from the manifest.
///
/// # Examples
///
/// ```
/// use rtss_overlay_packager::manifest::{PluginName, PluginVersion};
/// use rtss_overlay_packager::naming::ArchiveName;
///
/// let name = PluginName::try_from("foo").expect("valid name");
/// let version = PluginVersion::try_from("1.2.3").expect("valid version");
/// assert_eq!(ArchiveName::new(name, version).filename(), "foo-v1.2.3.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName {
    name: PluginName,
    version: PluginVersion,
}

impl ArchiveName {
    /// Create an archive name from validated components.
    #[must_use]
    pub fn new(name: PluginName, version: PluginVersion) -> Self {
        Self { name, version }
    }

    /// Derive the archive name from a loaded manifest.
    #[must_use]
    pub fn for_manifest(manifest: &PluginManifest) -> Self {
        Self::new(manifest.name().clone(), manifest.version().clone())
    }

    /// Return the filename as a string without consuming the value.
    #[must_use]
    pub fn filename(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-v{}{ARCHIVE_EXTENSION}", self.name, self.version)
    }
}

/// Return `true` when `file_name` carries the archive extension.
#[must_use]
pub fn is_archive_file_name(file_name: &str) -> bool {
    file_name.ends_with(ARCHIVE_EXTENSION)
}
