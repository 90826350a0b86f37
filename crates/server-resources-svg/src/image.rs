//! Vector images.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::error::{Result, SvgError};
use crate::geometry::SvgMetrics;
use crate::xml::{XmlElement, parse_xml};

/// An immutable SVG document with its resource name.
///
/// Cloning is cheap; the text is shared.
#[derive(Clone, PartialEq, Eq)]
pub struct VectorImage {
    name: Arc<str>,
    text: Arc<str>,
    light_dark_customizable: bool,
}

impl VectorImage {
    /// Create an image from SVG bytes.
    ///
    /// The bytes must be UTF-8; a leading byte order mark is dropped.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let name = name.into();
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let text = std::str::from_utf8(bytes).map_err(|source| SvgError::Utf8 {
            image: name.clone(),
            source,
        })?;
        Ok(Self::from_text(name, text))
    }

    /// Create an image from SVG text.
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: Arc::from(name.into()),
            text: Arc::from(text.into()),
            light_dark_customizable: false,
        }
    }

    /// Create an image by serializing an `<svg>` element.
    pub fn from_root(name: impl Into<String>, root: &XmlElement) -> Result<Self> {
        Ok(Self::from_text(name, root.to_xml_string()?))
    }

    /// Mark the image as produced for a colour scheme.
    ///
    /// Such images are regenerated when the scheme changes.
    pub fn into_light_dark_customizable(mut self) -> Self {
        self.light_dark_customizable = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The SVG text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The SVG text as bytes.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.text.as_bytes())
    }

    /// Whether this image was produced for a colour scheme.
    pub fn is_light_dark_customizable(&self) -> bool {
        self.light_dark_customizable
    }

    /// Parse the document and check that its root is `<svg>`.
    pub fn parse_root(&self) -> Result<XmlElement> {
        let root = parse_xml(&self.text)?;
        if root.local_name() != "svg" {
            return Err(SvgError::NotSvg {
                found: root.name().to_string(),
            });
        }
        Ok(root)
    }

    /// Natural size and content origin.
    pub fn metrics(&self) -> Result<SvgMetrics> {
        SvgMetrics::from_root(&self.parse_root()?, &self.name)
    }
}

impl fmt::Debug for VectorImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorImage")
            .field("name", &self.name)
            .field("len", &self.text.len())
            .field("light_dark_customizable", &self.light_dark_customizable)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    #[test]
    fn test_from_bytes_strips_bom() {
        let image = VectorImage::from_bytes("a.svg", b"\xEF\xBB\xBF<svg width=\"8\" height=\"4\"/>").unwrap();
        assert!(image.text().starts_with("<svg"));
        assert_eq!(image.metrics().unwrap().size, Size::new(8.0, 4.0));
        assert!(!image.is_light_dark_customizable());
    }

    #[test]
    fn test_invalid_utf8() {
        let err = VectorImage::from_bytes("bad.svg", &[0x3c, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, SvgError::Utf8 { .. }));
    }

    #[test]
    fn test_not_svg() {
        let image = VectorImage::from_text("x.svg", "<html/>");
        assert!(matches!(image.parse_root(), Err(SvgError::NotSvg { .. })));
    }
}
