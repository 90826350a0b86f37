//! Colour schemes and theme-aware vector images.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use server_resources_core::logging::targets;

use crate::image::VectorImage;
use crate::palette::RecolorPalette;
use crate::recolor::recolor;

/// The colour scheme images are drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Native light-skin colours.
    #[default]
    Light,
    /// Dark-skin colours produced by recoloring.
    Dark,
}

impl ColorScheme {
    /// Returns true if this is the dark scheme.
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

#[derive(Debug, Clone)]
struct Materialized {
    scheme: ColorScheme,
    target_size: Option<u32>,
    image: Arc<VectorImage>,
}

/// A vector image with one cached materialization for a colour scheme.
///
/// Only the variant for the most recently requested scheme and size is kept.
/// [`invalidate`](Self::invalidate) drops it; the next request rebuilds it
/// from the source.
pub struct ThemedVectorImage {
    source: VectorImage,
    cached: Mutex<Option<Materialized>>,
}

impl ThemedVectorImage {
    pub fn new(source: VectorImage) -> Self {
        Self {
            source,
            cached: Mutex::new(None),
        }
    }

    /// The untouched source image.
    pub fn source(&self) -> &VectorImage {
        &self.source
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    /// The image for a scheme and target size.
    ///
    /// The light scheme returns the source content; the dark scheme returns a
    /// recolored copy. Both are tagged light/dark customizable.
    pub fn image(
        &self,
        scheme: ColorScheme,
        target_size: Option<u32>,
        palette: &RecolorPalette,
    ) -> Arc<VectorImage> {
        let mut cached = self.cached.lock();
        if let Some(existing) = cached.as_ref()
            && existing.scheme == scheme
            && existing.target_size == target_size
        {
            return Arc::clone(&existing.image);
        }

        let image = Arc::new(match scheme {
            ColorScheme::Light => self.source.clone().into_light_dark_customizable(),
            ColorScheme::Dark => recolor(&self.source, target_size, palette),
        });
        *cached = Some(Materialized {
            scheme,
            target_size,
            image: Arc::clone(&image),
        });
        image
    }

    /// Drop the cached materialization.
    pub fn invalidate(&self) {
        if self.cached.lock().take().is_some() {
            tracing::trace!(
                target: targets::RECOLOR,
                image = self.source.name(),
                "invalidated themed image"
            );
        }
    }

    /// The scheme of the cached materialization, if any.
    pub fn cached_scheme(&self) -> Option<ColorScheme> {
        self.cached.lock().as_ref().map(|m| m.scheme)
    }
}

impl fmt::Debug for ThemedVectorImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemedVectorImage")
            .field("name", &self.source.name())
            .field("cached_scheme", &self.cached_scheme())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = r##"<svg width="16" height="16"><g><path fill="#212121" d="M0 0h16v16H0z"/></g></svg>"##;

    #[test]
    fn test_scheme_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            scheme: ColorScheme,
        }
        let w: Wrapper = toml::from_str(r#"scheme = "dark""#).unwrap();
        assert!(w.scheme.is_dark());
        assert_eq!(ColorScheme::default().to_string(), "light");
    }

    #[test]
    fn test_materialization_is_cached_per_scheme() {
        let palette = RecolorPalette::default();
        let themed = ThemedVectorImage::new(VectorImage::from_text("a.svg", ICON));

        let light = themed.image(ColorScheme::Light, None, &palette);
        assert_eq!(light.text(), ICON);
        assert!(light.is_light_dark_customizable());
        assert!(Arc::ptr_eq(&light, &themed.image(ColorScheme::Light, None, &palette)));

        let dark = themed.image(ColorScheme::Dark, None, &palette);
        assert!(dark.text().contains("#d6d6d6"));
        assert_eq!(themed.cached_scheme(), Some(ColorScheme::Dark));

        let dark_24 = themed.image(ColorScheme::Dark, Some(24), &palette);
        assert!(!Arc::ptr_eq(&dark, &dark_24));
    }

    #[test]
    fn test_invalidate() {
        let palette = RecolorPalette::default();
        let themed = ThemedVectorImage::new(VectorImage::from_text("a.svg", ICON));
        let first = themed.image(ColorScheme::Dark, None, &palette);
        themed.invalidate();
        assert_eq!(themed.cached_scheme(), None);
        let second = themed.image(ColorScheme::Dark, None, &palette);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.text(), second.text());
    }
}
