//! Service configuration.
//!
//! ```toml
//! archives = ["/opt/app/ServerResources.bin"]
//! directories = ["/opt/app/resources"]
//! max_archive_bytes = 157286400
//! composition_base_size = 120.0
//! palette = "/opt/app/dark-palette.toml"
//! color_scheme = "light"
//!
//! [retry]
//! attempts = 3
//! delay_ms = 1000
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use server_resources_core::container::DEFAULT_MAX_CONTAINER_BYTES;
use server_resources_core::{ArchiveFileSource, DirectorySource, ResourceSource, RetryPolicy};
use server_resources_svg::compose::DEFAULT_BASE_SIZE;
use server_resources_svg::{ColorScheme, RecolorPalette};

use crate::error::{Error, Result};

/// Configuration of a [`ResourceService`](crate::ResourceService).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Container files, consulted in order.
    pub archives: Vec<PathBuf>,
    /// Loose-file roots, consulted after the archives.
    pub directories: Vec<PathBuf>,
    /// Containers larger than this are ignored.
    pub max_archive_bytes: u64,
    /// Retry policy for file reads.
    pub retry: RetryPolicy,
    /// Side length of the composition canvas.
    pub composition_base_size: f32,
    /// TOML file overriding the built-in recolor palette.
    pub palette: Option<PathBuf>,
    /// Initial colour scheme.
    pub color_scheme: ColorScheme,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            archives: Vec::new(),
            directories: Vec::new(),
            max_archive_bytes: DEFAULT_MAX_CONTAINER_BYTES,
            retry: RetryPolicy::default(),
            composition_base_size: DEFAULT_BASE_SIZE,
            palette: None,
            color_scheme: ColorScheme::default(),
        }
    }
}

impl ResourceConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config("<string>", e.to_string()))
    }

    /// Read a configuration from a TOML file.
    ///
    /// Relative paths inside the file are resolved against its directory.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::config(path, e.to_string()))?;
        let mut config: Self = toml::from_str(&text).map_err(|e| Error::config(path, e.to_string()))?;

        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.archives.iter_mut().for_each(resolve);
        self.directories.iter_mut().for_each(resolve);
        self.palette.iter_mut().for_each(resolve);
    }

    /// Add a container file.
    pub fn with_archive(mut self, path: impl Into<PathBuf>) -> Self {
        self.archives.push(path.into());
        self
    }

    /// Add a loose-file root.
    pub fn with_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.directories.push(path.into());
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the initial colour scheme.
    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self
    }

    /// The sources described by this configuration, in lookup order.
    pub fn sources(&self) -> Vec<Arc<dyn ResourceSource>> {
        let archives = self.archives.iter().map(|path| {
            Arc::new(
                ArchiveFileSource::new(path)
                    .with_max_bytes(self.max_archive_bytes)
                    .with_retry(self.retry),
            ) as Arc<dyn ResourceSource>
        });
        let directories = self
            .directories
            .iter()
            .map(|root| Arc::new(DirectorySource::new(root)) as Arc<dyn ResourceSource>);
        archives.chain(directories).collect()
    }

    /// Load the recolor palette, falling back to the built-in tables.
    pub fn load_palette(&self) -> Result<RecolorPalette> {
        match &self.palette {
            Some(path) => Ok(RecolorPalette::from_toml_file(path)?),
            None => Ok(RecolorPalette::default()),
        }
    }
}
