//! Error types for the resource system.

use std::path::PathBuf;

/// Result type alias for resource operations.
pub type Result<T> = std::result::Result<T, ResourceError>;

/// Errors that can occur while loading or materializing resources.
///
/// Lookup misses are not errors; they are reported as `None` or
/// [`Resolved::NotFound`](crate::Resolved::NotFound).
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// The container has a bad signature or an invalid header record.
    #[error("Invalid resource container '{source_name}': {message}")]
    Format {
        source_name: String,
        message: String,
    },

    /// The file vanished before a read attempt.
    #[error("Resource file '{path}' does not exist")]
    FileMissing { path: PathBuf },

    /// Reading a file failed after all retry attempts.
    #[error("Failed to read resource file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An earlier load of this file failed and the failure was cached.
    #[error("Content of '{path}' is unavailable (previous load failed)")]
    Unavailable { path: PathBuf },

    /// A resource source could not be enumerated.
    #[error("Resource source '{source_name}' failed: {message}")]
    Source {
        source_name: String,
        message: String,
    },
}

impl ResourceError {
    /// Create a format error.
    pub fn format(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a missing-file error.
    pub fn file_missing(path: impl Into<PathBuf>) -> Self {
        Self::FileMissing { path: path.into() }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an unavailable-content error.
    pub fn unavailable(path: impl Into<PathBuf>) -> Self {
        Self::Unavailable { path: path.into() }
    }

    /// Create a source enumeration error.
    pub fn source_failed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Returns true if this is a container format error.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// Returns true if the file was missing.
    pub fn is_file_missing(&self) -> bool {
        matches!(self, Self::FileMissing { .. })
    }
}
