//! Error types for the resource service.

use std::path::PathBuf;

use server_resources_core::ResourceError;
use server_resources_svg::SvgError;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the resource service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Loading or reading a resource failed.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Parsing, recoloring or composing a vector image failed.
    #[error(transparent)]
    Svg(#[from] SvgError),

    /// A configuration file could not be read or parsed.
    #[error("Invalid configuration '{path}': {message}")]
    Config { path: PathBuf, message: String },
}

impl Error {
    /// Create a configuration error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}
