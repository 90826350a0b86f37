//! Error types for SVG processing.

/// Result type alias for SVG operations.
pub type Result<T> = std::result::Result<T, SvgError>;

/// Errors that can occur while parsing, recoloring or composing SVG images.
#[derive(Debug, thiserror::Error)]
pub enum SvgError {
    /// The document is not well-formed XML.
    #[error("XML error: {message}")]
    Xml { message: String },

    /// The document has no root element.
    #[error("XML document has no root element")]
    NoRoot,

    /// The root element is not `<svg>`.
    #[error("Expected <svg> root element, found <{found}>")]
    NotSvg { found: String },

    /// The natural size of an image is missing, unparsable or not positive.
    #[error("Invalid dimensions for '{image}': {message}")]
    InvalidDimensions { image: String, message: String },

    /// Image bytes are not valid UTF-8.
    #[error("Image '{image}' is not valid UTF-8: {source}")]
    Utf8 {
        image: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// A composition child could not be resolved.
    #[error("Vector image '{name}' not found")]
    MissingImage { name: String },

    /// The recolor palette configuration is invalid.
    #[error("Invalid palette configuration: {message}")]
    Config { message: String },
}

impl SvgError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml {
            message: message.into(),
        }
    }

    /// Create a dimensions error.
    pub fn invalid_dimensions(image: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            image: image.into(),
            message: message.into(),
        }
    }

    /// Create a missing-image error.
    pub fn missing_image(name: impl Into<String>) -> Self {
        Self::MissingImage { name: name.into() }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
