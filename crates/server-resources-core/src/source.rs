//! Resource sources.
//!
//! A [`ResourceSource`] enumerates the named byte resources that feed an
//! index build. Sources are consulted in order; for duplicate item keys the
//! earlier source wins.
//!
//! | Source | Backing | Content |
//! |--------|---------|---------|
//! | [`ArchiveFileSource`] | a `ServerResources.bin` on disk | archive slices |
//! | [`ArchiveBytesSource`] | an in-memory container image | archive slices |
//! | [`DirectorySource`] | loose files under a root | lazily read files |
//! | [`EmbeddedSource`] | files compiled in with `include_dir!` | static slices |

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use include_dir::{Dir, DirEntry};

use crate::container::{self, DEFAULT_MAX_CONTAINER_BYTES};
use crate::error::{ResourceError, Result};
use crate::logging::targets;
use crate::reader::RetryPolicy;

/// Where the bytes of a raw resource live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawContent {
    /// A slice of an in-memory buffer.
    Archive(Bytes),
    /// A file to be read on demand.
    File(PathBuf),
}

/// A named resource as enumerated by a source, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResource {
    pub name: String,
    pub content: RawContent,
}

impl RawResource {
    /// A resource backed by in-memory bytes.
    pub fn archive(name: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            content: RawContent::Archive(data),
        }
    }

    /// A resource backed by a file.
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            content: RawContent::File(path.into()),
        }
    }
}

/// Enumerates the raw resources available to an index.
pub trait ResourceSource: Send + Sync {
    /// A human-readable name used in logs and errors.
    fn name(&self) -> &str;

    /// Enumerate all resources of this source.
    ///
    /// An error means the source contributes nothing.
    fn raw_resources(&self) -> Result<Vec<RawResource>>;
}

impl fmt::Debug for dyn ResourceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceSource")
            .field("name", &self.name())
            .finish()
    }
}

fn entries_to_raw(entries: Vec<container::ContainerEntry>) -> Vec<RawResource> {
    entries
        .into_iter()
        .map(|entry| RawResource::archive(entry.name, entry.data))
        .collect()
}

/// A container file on disk.
#[derive(Debug, Clone)]
pub struct ArchiveFileSource {
    path: PathBuf,
    label: String,
    max_bytes: u64,
    retry: RetryPolicy,
}

impl ArchiveFileSource {
    /// Create a source for the container at `path` with default limits.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            label: path.display().to_string(),
            path,
            max_bytes: DEFAULT_MAX_CONTAINER_BYTES,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the size above which the container is ignored.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Set the read retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResourceSource for ArchiveFileSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn raw_resources(&self) -> Result<Vec<RawResource>> {
        let entries = container::read_container_file(&self.path, self.max_bytes, &self.retry)?;
        Ok(entries_to_raw(entries))
    }
}

/// A container image held in memory.
#[derive(Debug, Clone)]
pub struct ArchiveBytesSource {
    label: String,
    data: Bytes,
}

impl ArchiveBytesSource {
    pub fn new(label: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

impl ResourceSource for ArchiveBytesSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn raw_resources(&self) -> Result<Vec<RawResource>> {
        let entries = container::parse_container(&self.label, &self.data)?;
        Ok(entries_to_raw(entries))
    }
}

/// Loose files under a root directory.
///
/// Resource names are the root-relative paths with `/` separators. File
/// content is not read until an item is accessed.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    label: String,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            label: root.display().to_string(),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn walk(&self, dir: &Path, prefix: &str, out: &mut Vec<RawResource>) -> Result<()> {
        let read_dir = fs::read_dir(dir).map_err(|e| {
            ResourceError::source_failed(&self.label, format!("{}: {e}", dir.display()))
        })?;

        let mut entries: Vec<_> = read_dir.filter_map(|entry| entry.ok()).collect();
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                tracing::debug!(
                    target: targets::SOURCE,
                    path = %entry.path().display(),
                    "skipping non-UTF-8 file name"
                );
                continue;
            };
            let name = if prefix.is_empty() {
                file_name.to_string()
            } else {
                format!("{prefix}/{file_name}")
            };

            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let path = entry.path();
            if file_type.is_dir() {
                self.walk(&path, &name, out)?;
            } else if file_type.is_file() {
                out.push(RawResource::file(name, path));
            } else if file_type.is_symlink() {
                // Links to files are served; links to directories are not walked.
                if path.is_file() {
                    out.push(RawResource::file(name, path));
                } else {
                    tracing::debug!(
                        target: targets::SOURCE,
                        path = %path.display(),
                        "not following directory link"
                    );
                }
            }
        }
        Ok(())
    }
}

impl ResourceSource for DirectorySource {
    fn name(&self) -> &str {
        &self.label
    }

    fn raw_resources(&self) -> Result<Vec<RawResource>> {
        let mut out = Vec::new();
        self.walk(&self.root, "", &mut out)?;
        Ok(out)
    }
}

/// Resources compiled into the binary.
///
/// ```ignore
/// use include_dir::{include_dir, Dir};
/// use server_resources_core::EmbeddedSource;
///
/// static ICONS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/icons");
/// let source = EmbeddedSource::new("icons", &ICONS);
/// ```
#[derive(Clone, Copy)]
pub struct EmbeddedSource {
    label: &'static str,
    dir: &'static Dir<'static>,
}

impl EmbeddedSource {
    pub const fn new(label: &'static str, dir: &'static Dir<'static>) -> Self {
        Self { label, dir }
    }

    fn collect(dir: &'static Dir<'static>, out: &mut Vec<RawResource>) {
        for entry in dir.entries() {
            match entry {
                DirEntry::Dir(subdir) => Self::collect(subdir, out),
                DirEntry::File(file) => {
                    if let Some(path) = file.path().to_str() {
                        out.push(RawResource::archive(path, Bytes::from_static(file.contents())));
                    }
                }
            }
        }
    }
}

impl fmt::Debug for EmbeddedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedSource")
            .field("label", &self.label)
            .finish()
    }
}

impl ResourceSource for EmbeddedSource {
    fn name(&self) -> &str {
        self.label
    }

    fn raw_resources(&self) -> Result<Vec<RawResource>> {
        let mut out = Vec::new();
        Self::collect(self.dir, &mut out);
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}
