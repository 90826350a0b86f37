//! Resource name normalization and classification.
//!
//! Resource names follow the grammar `segment(/segment)*[-sizeSuffix].extension`.
//! Names are case-insensitive, `\` and `/` are interchangeable and leading
//! slashes are ignored, so `"\Pic\Foo.PNG"` and `"/pic/foo.png"` denote the
//! same resource.
//!
//! Every name yields two keys:
//!
//! - the **item key**: the fully normalized name, including the size suffix
//!   and the extension (`pic/foo-16x16.png`)
//! - the **pack key**: the item key with both stripped (`pic/foo`), grouping
//!   the size and type variants of one logical icon

use std::fmt;

/// Category of a resource, derived from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    /// Unknown or missing extension.
    #[default]
    None,
    /// Raster images (png, jpg, gif, ...).
    Bitmap,
    /// SVG vector images.
    Vector,
    /// Windows icon files.
    Icon,
    /// Cursor files.
    Cursor,
    /// Audio clips.
    Audio,
    /// Video clips.
    Video,
    /// HTML and XML documents.
    Xml,
}

impl ContentType {
    /// Classify a file extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "bmp" | "jpg" | "jpeg" | "png" | "gif" | "pcx" | "tif" | "tiff" => Self::Bitmap,
            "svg" => Self::Vector,
            "ico" => Self::Icon,
            "cur" => Self::Cursor,
            "wav" | "flac" | "mp3" | "mpc" => Self::Audio,
            "mp4" | "mpg" | "mpeg" | "avi" => Self::Video,
            "htm" | "html" | "xml" => Self::Xml,
            _ => Self::None,
        }
    }

    /// Whether resources of this type carry a size tier suffix.
    pub fn supports_size(self) -> bool {
        matches!(self, Self::Bitmap | Self::Vector | Self::Icon | Self::Cursor)
    }
}

/// Size tier of a resource, derived from its file name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizeType {
    /// No recognized suffix.
    #[default]
    None,
    /// `-16x16` or `-small`.
    Small,
    /// `-24x24`.
    Medium,
    /// `-32x32` or `-large`.
    Large,
}

impl SizeType {
    /// Nominal pixel size of the tier.
    pub fn pixels(self) -> Option<u32> {
        match self {
            Self::None => None,
            Self::Small => Some(16),
            Self::Medium => Some(24),
            Self::Large => Some(32),
        }
    }

    /// The tier whose nominal pixel size equals `pixels`.
    pub fn from_pixels(pixels: u32) -> Self {
        match pixels {
            16 => Self::Small,
            24 => Self::Medium,
            32 => Self::Large,
            _ => Self::None,
        }
    }

    /// Order in which size tiers are tried for a request of this size.
    ///
    /// An unspecified request behaves like [`SizeType::Large`].
    pub fn fallback_order(self) -> [SizeType; 4] {
        match self {
            Self::Small => [Self::Small, Self::Medium, Self::Large, Self::None],
            Self::Medium => [Self::Medium, Self::Large, Self::Small, Self::None],
            Self::Large | Self::None => [Self::Large, Self::Medium, Self::Small, Self::None],
        }
    }
}

/// Recognized size suffixes, matched immediately before the extension.
const SIZE_SUFFIXES: &[(&str, SizeType)] = &[
    ("-16x16", SizeType::Small),
    ("-small", SizeType::Small),
    ("-24x24", SizeType::Medium),
    ("-32x32", SizeType::Large),
    ("-large", SizeType::Large),
];

/// Normalize a resource name into its item key form.
///
/// Trims whitespace, lower-cases, replaces `\` with `/` and strips any
/// number of leading `/`.
pub fn normalize_name(name: &str) -> String {
    let normalized = name.trim().to_lowercase().replace('\\', "/");
    normalized.trim_start_matches('/').to_string()
}

/// Split a normalized name into stem and extension.
///
/// Only a dot in the last path segment starts an extension.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    let segment_start = name.rfind('/').map_or(0, |i| i + 1);
    match name[segment_start..].rfind('.') {
        Some(dot) => {
            let dot = segment_start + dot;
            (&name[..dot], Some(&name[dot + 1..]))
        }
        None => (name, None),
    }
}

/// A parsed and classified resource name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceName {
    item_key: String,
    pack_key: String,
    content_type: ContentType,
    size_type: SizeType,
}

impl ResourceName {
    /// Parse and normalize a raw resource name.
    pub fn parse(name: &str) -> Self {
        let item_key = normalize_name(name);
        let (stem, extension) = split_extension(&item_key);
        let content_type = extension.map(ContentType::from_extension).unwrap_or_default();

        let mut pack_key = stem;
        let mut size_type = SizeType::None;
        if content_type.supports_size() {
            for (suffix, size) in SIZE_SUFFIXES {
                if let Some(base) = stem.strip_suffix(suffix) {
                    pack_key = base;
                    size_type = *size;
                    break;
                }
            }
        }

        let pack_key = pack_key.to_string();
        Self {
            item_key,
            pack_key,
            content_type,
            size_type,
        }
    }

    /// The fully normalized name, including size suffix and extension.
    pub fn item_key(&self) -> &str {
        &self.item_key
    }

    /// The item key without size suffix and extension.
    pub fn pack_key(&self) -> &str {
        &self.pack_key
    }

    /// Content type derived from the extension.
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Size tier derived from the suffix.
    pub fn size_type(&self) -> SizeType {
        self.size_type
    }

    /// The extension of the item key, if any.
    pub fn extension(&self) -> Option<&str> {
        split_extension(&self.item_key).1
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.item_key)
    }
}
