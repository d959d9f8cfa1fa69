//! In-process zip backend.
//!
//! Entries are written in sorted order with a fixed timestamp and fixed
//! permissions, so unchanged inputs produce a byte-identical archive.

use super::{ArchiveReport, ArchiveRequest, Archiver, discard_partial};
use crate::error::{PackagerError, Result};
use camino::Utf8Path;
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

const LABEL: &str = "builtin zip";

/// Archives with the `zip` crate, without an external tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiver;

/// One entry of the archive: its on-disk source and its name inside the zip.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    source: PathBuf,
    name: String,
    kind: EntryKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
    /// A symbolic link, stored as a link to this target.
    Symlink(String),
}

impl Archiver for ZipArchiver {
    fn label(&self) -> String {
        LABEL.to_owned()
    }

    fn archive(&self, request: &ArchiveRequest) -> Result<ArchiveReport> {
        let result = write_archive(request).map_err(|e| PackagerError::ArchiveTool {
            tool: LABEL.to_owned(),
            message: e.to_string(),
        });
        if result.is_err() {
            discard_partial(&request.archive_path);
        }
        result.map(|count| {
            log::info!("wrote {count} entries to {}", request.archive_path);
            ArchiveReport::default()
        })
    }
}

fn write_archive(request: &ArchiveRequest) -> io::Result<usize> {
    let root = request.staging_root.join(&request.plugin_dir_name);
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("staged directory {root} does not exist"),
        ));
    }

    let entries = collect_entries(&root, &request.plugin_dir_name)?;

    let file = File::create(&request.archive_path)?;
    let mut writer = ZipWriter::new(file);

    for entry in &entries {
        match &entry.kind {
            EntryKind::Dir => writer.add_directory(entry.name.as_str(), options(0o755))?,
            EntryKind::File => {
                writer.start_file(entry.name.as_str(), options(0o644))?;
                let mut source = File::open(&entry.source)?;
                io::copy(&mut source, &mut writer)?;
            }
            EntryKind::Symlink(target) => {
                writer.add_symlink(entry.name.as_str(), target.as_str(), options(0o777))?;
            }
        }
    }
    writer.finish()?;
    Ok(entries.len())
}

fn options(mode: u32) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(mode)
}

/// Collect `root` and everything below it depth-first in name order.
///
/// Names use `/` as the separator inside the archive regardless of platform
/// and start with `prefix`. Symbolic links are recorded, not followed.
fn collect_entries(root: &Utf8Path, prefix: &str) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        let relative = entry.path().strip_prefix(root).map_err(io::Error::other)?;
        let mut name = prefix.to_owned();
        for component in relative.components() {
            name.push('/');
            name.push_str(&component.as_os_str().to_string_lossy());
        }

        let file_type = entry.file_type();
        let kind = if file_type.is_dir() {
            name.push('/');
            EntryKind::Dir
        } else if file_type.is_symlink() {
            let target = fs::read_link(entry.path())?;
            EntryKind::Symlink(target.to_string_lossy().into_owned())
        } else {
            EntryKind::File
        };
        entries.push(Entry {
            source: entry.into_path(),
            name,
            kind,
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use std::io::Read;
    use tempfile::TempDir;

    struct Staged {
        _dir: TempDir,
        request: ArchiveRequest,
    }

    #[fixture]
    fn staged() -> Staged {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8");
        let plugin = root.join("temp_dist/foo");
        fs::create_dir_all(plugin.join("dist/assets")).expect("mkdir");
        fs::write(plugin.join("package.json"), b"{}").expect("write");
        fs::write(plugin.join("dist/index.js"), b"console.log(1)").expect("write");
        fs::write(plugin.join("dist/assets/logo.svg"), b"<svg/>").expect("write");
        Staged {
            _dir: dir,
            request: ArchiveRequest {
                staging_root: root.join("temp_dist"),
                plugin_dir_name: "foo".to_owned(),
                archive_path: root.join("foo-v1.0.0.zip"),
            },
        }
    }

    fn entry_names(path: &Utf8Path) -> Vec<String> {
        let archive = zip::ZipArchive::new(File::open(path).expect("open")).expect("zip");
        archive.file_names().map(str::to_owned).collect()
    }

    #[rstest]
    fn archive_top_level_is_plugin_directory(staged: Staged) {
        ZipArchiver.archive(&staged.request).expect("archive");

        let names = entry_names(&staged.request.archive_path);
        assert!(names.iter().all(|n| n.starts_with("foo/")), "{names:?}");
        assert!(names.contains(&"foo/package.json".to_owned()));
        assert!(names.contains(&"foo/dist/assets/logo.svg".to_owned()));
        assert!(!names.iter().any(|n| n.contains("temp_dist")));
    }

    #[rstest]
    fn archive_preserves_file_contents(staged: Staged) {
        ZipArchiver.archive(&staged.request).expect("archive");

        let file = File::open(&staged.request.archive_path).expect("open");
        let mut archive = zip::ZipArchive::new(file).expect("zip");
        let mut entry = archive.by_name("foo/dist/index.js").expect("entry");
        let mut contents = String::new();
        entry.read_to_string(&mut contents).expect("read");
        assert_eq!(contents, "console.log(1)");
    }

    #[rstest]
    fn archive_is_reproducible(staged: Staged) {
        ZipArchiver.archive(&staged.request).expect("first archive");
        let first = fs::read(&staged.request.archive_path).expect("read");
        ZipArchiver.archive(&staged.request).expect("second archive");
        let second = fs::read(&staged.request.archive_path).expect("read");
        assert_eq!(first, second);
    }

    #[cfg(unix)]
    #[rstest]
    fn archive_stores_symlinks_without_following(staged: Staged) {
        let dist = staged.request.staging_root.join("foo/dist");
        std::os::unix::fs::symlink(&dist, dist.join("self")).expect("symlink");

        ZipArchiver.archive(&staged.request).expect("cycle is not followed");

        let names = entry_names(&staged.request.archive_path);
        assert!(!names.iter().any(|n| n.starts_with("foo/dist/self/")), "{names:?}");
        let file = File::open(&staged.request.archive_path).expect("open");
        let mut archive = zip::ZipArchive::new(file).expect("zip");
        let link = archive.by_name("foo/dist/self").expect("link entry");
        let mode = link.unix_mode().expect("unix mode");
        assert_eq!(mode & 0o170_000, 0o120_000, "stored as a symlink");
    }

    #[rstest]
    fn missing_staged_directory_leaves_no_archive(staged: Staged) {
        let request = ArchiveRequest {
            plugin_dir_name: "absent".to_owned(),
            ..staged.request.clone()
        };
        let err = ZipArchiver.archive(&request).expect_err("missing tree");
        assert!(matches!(err, PackagerError::ArchiveTool { .. }));
        assert!(!request.archive_path.exists());
    }
}
