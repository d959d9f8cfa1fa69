//! Plugin manifest loading.
//!
//! The manifest is the project's `package.json`. Only `name` and `version`
//! are consumed; every other field is ignored. Both values are validated here
//! because `name` becomes a directory name and both end up in the archive
//! filename.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fmt;
use std::fs;

/// Raw manifest fields as they appear on disk.
///
/// Fields are optional so that absence can be reported as
/// [`PackagerError::ManifestFieldMissing`] rather than a generic parse error.
#[derive(Debug, Deserialize)]
struct RawManifest {
    name: Option<String>,
    version: Option<String>,
}

/// The plugin identifier from the manifest's `name` field.
///
/// Guaranteed to be a single, non-empty path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginName(String);

impl PluginName {
    /// Return the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for PluginName {
    type Error = PackagerError;

    fn try_from(value: &str) -> Result<Self> {
        validate_name(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for PluginName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The plugin version, embedded verbatim in the archive filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginVersion(String);

impl PluginVersion {
    /// Return the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for PluginVersion {
    type Error = PackagerError;

    fn try_from(value: &str) -> Result<Self> {
        if value.trim().is_empty() {
            return Err(invalid("version", value, "version must not be empty"));
        }
        if value.contains(['/', '\\']) {
            return Err(invalid(
                "version",
                value,
                "version must not contain path separators",
            ));
        }
        Ok(Self(value.to_owned()))
    }
}

impl fmt::Display for PluginVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The subset of the plugin manifest used for packaging.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use rtss_overlay_packager::manifest::PluginManifest;
///
/// let manifest = PluginManifest::parse(
///     r#"{"name": "rtss-overlay", "version": "1.2.3", "private": true}"#,
///     Utf8Path::new("package.json"),
/// )
/// .expect("valid manifest");
/// assert_eq!(manifest.name().as_str(), "rtss-overlay");
/// assert_eq!(manifest.version().as_str(), "1.2.3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginManifest {
    name: PluginName,
    version: PluginVersion,
}

impl PluginManifest {
    /// Create a manifest from validated parts.
    #[must_use]
    pub fn new(name: PluginName, version: PluginVersion) -> Self {
        Self { name, version }
    }

    /// Read and validate the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ManifestRead`] if the file cannot be read or
    /// is not JSON, [`PackagerError::ManifestFieldMissing`] if `name` or
    /// `version` is absent, and [`PackagerError::InvalidManifestField`] if a
    /// field cannot be used to name the artefact.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| PackagerError::ManifestRead {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        Self::parse(&contents, path)
    }

    /// Parse manifest JSON; `path` is used only for error reporting.
    ///
    /// # Errors
    ///
    /// See [`PluginManifest::load`].
    pub fn parse(json: &str, path: &Utf8Path) -> Result<Self> {
        let raw: RawManifest =
            serde_json::from_str(json).map_err(|e| PackagerError::ManifestRead {
                path: path.to_owned(),
                reason: e.to_string(),
            })?;

        let name = raw.name.ok_or_else(|| missing(path, "name"))?;
        let version = raw.version.ok_or_else(|| missing(path, "version"))?;

        Ok(Self {
            name: PluginName::try_from(name.as_str())?,
            version: PluginVersion::try_from(version.as_str())?,
        })
    }

    /// Return the plugin name.
    #[must_use]
    pub fn name(&self) -> &PluginName {
        &self.name
    }

    /// Return the plugin version.
    #[must_use]
    pub fn version(&self) -> &PluginVersion {
        &self.version
    }
}

fn missing(path: &Utf8Path, field: &'static str) -> PackagerError {
    PackagerError::ManifestFieldMissing {
        path: Utf8PathBuf::from(path),
        field,
    }
}

fn invalid(field: &'static str, value: &str, reason: &str) -> PackagerError {
    PackagerError::InvalidManifestField {
        field,
        value: value.to_owned(),
        reason: reason.to_owned(),
    }
}

/// The name becomes the staging subdirectory and the archive's top-level
/// entry, so it must be exactly one normal path component.
fn validate_name(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid("name", value, "name must not be empty"));
    }
    if value.contains(['/', '\\']) {
        return Err(invalid("name", value, "name must not contain path separators"));
    }
    if value == "." || value == ".." {
        return Err(invalid("name", value, "name must not be a relative path marker"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(json: &str) -> Result<PluginManifest> {
        PluginManifest::parse(json, Utf8Path::new("package.json"))
    }

    #[test]
    fn parses_name_and_version_ignoring_other_fields() {
        let manifest = parse(r#"{"name":"foo","version":"1.2.3","scripts":{"build":"x"}}"#)
            .expect("valid manifest");
        assert_eq!(manifest.name().as_str(), "foo");
        assert_eq!(manifest.version().as_str(), "1.2.3");
    }

    #[rstest]
    #[case::no_name(r#"{"version":"1.0.0"}"#, "name")]
    #[case::no_version(r#"{"name":"foo"}"#, "version")]
    #[case::null_name(r#"{"name":null,"version":"1.0.0"}"#, "name")]
    fn reports_missing_fields(#[case] json: &str, #[case] expected: &str) {
        let err = parse(json).expect_err("missing field must fail");
        assert!(
            matches!(err, PackagerError::ManifestFieldMissing { field, .. } if field == expected),
            "unexpected error: {err:?}"
        );
    }

    #[rstest]
    #[case::not_json("{not json")]
    #[case::wrong_type(r#"{"name":42,"version":"1.0.0"}"#)]
    #[case::array("[]")]
    fn rejects_malformed_json(#[case] json: &str) {
        let err = parse(json).expect_err("malformed manifest must fail");
        assert!(matches!(err, PackagerError::ManifestRead { .. }));
    }

    #[rstest]
    #[case::empty_name(r#"{"name":"","version":"1.0.0"}"#)]
    #[case::nested_name(r#"{"name":"a/b","version":"1.0.0"}"#)]
    #[case::parent_name(r#"{"name":"..","version":"1.0.0"}"#)]
    #[case::blank_version(r#"{"name":"foo","version":"  "}"#)]
    fn rejects_unusable_fields(#[case] json: &str) {
        let err = parse(json).expect_err("invalid field must fail");
        assert!(matches!(err, PackagerError::InvalidManifestField { .. }));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::try_from(dir.path().join("package.json")).expect("utf8");
        let err = PluginManifest::load(&path).expect_err("missing manifest must fail");
        assert!(matches!(err, PackagerError::ManifestRead { .. }));
    }
}
