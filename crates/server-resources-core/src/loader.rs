//! Lazy content materialization.
//!
//! Item content comes from one of two places, fixed when the item is built:
//!
//! - **Archive**: the payload is copied out of the container buffer when the
//!   index is built, so access never performs I/O.
//! - **File**: the payload is read from disk on first access. Both success
//!   and failure are cached, so a file is read at most once per index
//!   generation.

use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use parking_lot::Mutex;

use crate::error::{ResourceError, Result};
use crate::logging::targets;
use crate::reader::{RetryPolicy, read_with_retry};

/// Load state of file-backed content.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    /// No read has been attempted yet.
    #[default]
    NotLoaded,
    /// The file was read successfully.
    Loaded(Bytes),
    /// The read failed; it will not be attempted again.
    Failed,
}

impl LoadState {
    /// Returns true once a read was attempted, successful or not.
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::NotLoaded)
    }
}

/// The content of a resource item.
pub enum ItemContent {
    /// Bytes owned by the item.
    Archive(Bytes),
    /// Bytes read lazily from a file.
    File {
        path: PathBuf,
        retry: RetryPolicy,
        state: Mutex<LoadState>,
    },
}

impl ItemContent {
    /// Content backed by an archive slice.
    ///
    /// The slice is copied so the item does not keep the whole container
    /// buffer alive.
    pub fn from_archive(slice: &[u8]) -> Self {
        Self::Archive(Bytes::copy_from_slice(slice))
    }

    /// Content read from `path` on first access.
    pub fn from_file(path: impl Into<PathBuf>, retry: RetryPolicy) -> Self {
        Self::File {
            path: path.into(),
            retry,
            state: Mutex::new(LoadState::NotLoaded),
        }
    }

    /// Materialize the content.
    ///
    /// For file-backed content the first call reads the file and returns the
    /// read error on failure. Later calls after a failure return
    /// [`ResourceError::Unavailable`] without touching the filesystem.
    pub fn load(&self) -> Result<Bytes> {
        match self {
            Self::Archive(data) => Ok(data.clone()),
            Self::File { path, retry, state } => {
                let mut state = state.lock();
                match &*state {
                    LoadState::Loaded(data) => Ok(data.clone()),
                    LoadState::Failed => Err(ResourceError::unavailable(path)),
                    LoadState::NotLoaded => match read_with_retry(path, retry) {
                        Ok(data) => {
                            let data = Bytes::from(data);
                            tracing::trace!(
                                target: targets::LOADER,
                                path = %path.display(),
                                len = data.len(),
                                "loaded file content"
                            );
                            *state = LoadState::Loaded(data.clone());
                            Ok(data)
                        }
                        Err(e) => {
                            tracing::warn!(
                                target: targets::LOADER,
                                path = %path.display(),
                                error = %e,
                                "failed to load file content"
                            );
                            *state = LoadState::Failed;
                            Err(e)
                        }
                    },
                }
            }
        }
    }

    /// The content bytes, or `None` if they could not be loaded.
    pub fn bytes(&self) -> Option<Bytes> {
        self.load().ok()
    }

    /// Whether content is available. Forces a load.
    pub fn exists(&self) -> bool {
        self.load().is_ok()
    }

    /// Whether the content has been materialized (or has failed to be).
    pub fn is_loaded(&self) -> bool {
        match self {
            Self::Archive(_) => true,
            Self::File { state, .. } => state.lock().is_settled(),
        }
    }

    /// Snapshot of the load state.
    pub fn state(&self) -> LoadState {
        match self {
            Self::Archive(data) => LoadState::Loaded(data.clone()),
            Self::File { state, .. } => state.lock().clone(),
        }
    }

    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Archive(_) => None,
            Self::File { path, .. } => Some(path),
        }
    }
}

impl fmt::Debug for ItemContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive(data) => f.debug_tuple("Archive").field(&data.len()).finish(),
            Self::File { path, .. } => f
                .debug_struct("File")
                .field("path", path)
                .field("is_loaded", &self.is_loaded())
                .finish(),
        }
    }
}
