//! Error types for the plugin packager.
//!
//! Each variant names the pipeline stage that failed so the CLI can report
//! where a run stopped. Every error is fatal to the run; nothing is retried.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while packaging the plugin.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The manifest file is missing or is not valid JSON.
    #[error("failed to read manifest {path}: {reason}")]
    ManifestRead {
        /// Path of the manifest that could not be read.
        path: Utf8PathBuf,
        /// Description of the read or parse failure.
        reason: String,
    },

    /// A required manifest field is absent.
    #[error("manifest {path} is missing required field `{field}`")]
    ManifestFieldMissing {
        /// Path of the manifest.
        path: Utf8PathBuf,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A manifest field is present but cannot be used to name the artefact.
    #[error("manifest field `{field}` has invalid value {value:?}: {reason}")]
    InvalidManifestField {
        /// Name of the rejected field.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Constraint that was violated.
        reason: String,
    },

    /// Creating, clearing, or populating the staging directory failed.
    #[error("staging failed at {path}: {source}")]
    StagingIo {
        /// Path being staged when the failure occurred.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The archiving tool failed to start, exited unsuccessfully, or timed out.
    #[error("archiving with {tool} failed: {message}")]
    ArchiveTool {
        /// Name of the archiving backend or program.
        tool: String,
        /// Description of the failure, including tool diagnostics.
        message: String,
    },

    /// Ensuring or sweeping the output directory failed.
    #[error("output directory {path} could not be prepared: {source}")]
    OutputIo {
        /// Path of the output directory or the entry being removed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The optional `packager.toml` could not be read or parsed.
    #[error("invalid packager configuration {path}: {reason}")]
    Config {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// Failed to write console output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

impl PackagerError {
    /// Build a [`PackagerError::StagingIo`] for `path`.
    pub(crate) fn staging(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::StagingIo {
            path: path.into(),
            source,
        }
    }

    /// Build a [`PackagerError::OutputIo`] for `path`.
    pub(crate) fn output(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::OutputIo {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_field_missing_names_field() {
        let err = PackagerError::ManifestFieldMissing {
            path: Utf8PathBuf::from("package.json"),
            field: "version",
        };
        let msg = err.to_string();
        assert!(msg.contains("package.json"));
        assert!(msg.contains("`version`"));
    }

    #[test]
    fn archive_tool_error_includes_tool_and_message() {
        let err = PackagerError::ArchiveTool {
            tool: "zip".to_owned(),
            message: "exited with status 12".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("zip"));
        assert!(msg.contains("status 12"));
    }

    #[test]
    fn staging_error_preserves_source() {
        let err = PackagerError::staging("temp_dist", std::io::Error::other("disk full"));
        assert!(err.to_string().contains("temp_dist"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn output_error_preserves_source() {
        let err = PackagerError::output("dist", std::io::Error::other("permission denied"));
        assert!(err.to_string().contains("dist"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
