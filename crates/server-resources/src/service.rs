//! The resource service.
//!
//! A [`ResourceService`] owns one index generation at a time. Lookups take a
//! snapshot of the current generation, so a [`reload`](ResourceService::reload)
//! never exposes a partially built index: readers holding the previous
//! generation keep a consistent view until they drop it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::{Mutex, RwLock};
use server_resources_core::logging::targets;
use server_resources_core::{
    ContentType, ResourceIndex, ResourceItem, ResourceName, ResourceSource, Resolved, SizeType,
};
use server_resources_svg::{
    ColorScheme, CompositionDescriptor, RecolorPalette, ThemedVectorImage, VectorImage,
};

use crate::config::ResourceConfig;
use crate::error::Result;

/// Resolves resource names to content for one application.
pub struct ResourceService {
    config: ResourceConfig,
    sources: Vec<Arc<dyn ResourceSource>>,
    palette: RecolorPalette,
    index: RwLock<Arc<ResourceIndex>>,
    scheme: RwLock<ColorScheme>,
    themed: Mutex<HashMap<String, Arc<ThemedVectorImage>>>,
}

static_assertions::assert_impl_all!(ResourceService: Send, Sync);

impl ResourceService {
    /// Build a service from its configuration.
    ///
    /// Sources that fail to load are skipped; the service then reports
    /// [`is_loaded`](Self::is_loaded) as false rather than failing. Only an
    /// unreadable palette file is an error.
    pub fn open(config: ResourceConfig) -> Result<Self> {
        let sources = config.sources();
        Self::with_sources(config, sources)
    }

    /// Build a service over explicit sources, in lookup order.
    ///
    /// The archive and directory lists of `config` are ignored.
    pub fn with_sources(
        config: ResourceConfig,
        sources: Vec<Arc<dyn ResourceSource>>,
    ) -> Result<Self> {
        let palette = config.load_palette()?;
        let index = ResourceIndex::build(&sources, &config.retry);
        tracing::info!(
            target: targets::SERVICE,
            sources = sources.len(),
            loaded = index.is_loaded(),
            scheme = %config.color_scheme,
            "resource service ready"
        );

        Ok(Self {
            scheme: RwLock::new(config.color_scheme),
            config,
            sources,
            palette,
            index: RwLock::new(Arc::new(index)),
            themed: Mutex::new(HashMap::new()),
        })
    }

    /// The configuration the service was built with.
    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// The recolor palette in use.
    pub fn palette(&self) -> &RecolorPalette {
        &self.palette
    }

    /// A snapshot of the current index generation.
    pub fn index(&self) -> Arc<ResourceIndex> {
        Arc::clone(&self.index.read())
    }

    /// Rebuild the index from the sources and replace the current one whole.
    ///
    /// Cached themed images belong to the old generation and are dropped.
    pub fn reload(&self) {
        let index = Arc::new(ResourceIndex::build(&self.sources, &self.config.retry));
        let loaded = index.is_loaded();
        *self.index.write() = index;
        self.themed.lock().clear();
        tracing::info!(target: targets::SERVICE, loaded, "reloaded resources");
    }

    /// Whether the current generation holds at least one item.
    pub fn is_loaded(&self) -> bool {
        self.index.read().is_loaded()
    }

    /// Whether a name resolves to an item (exact) or a pack.
    pub fn contains_resource(&self, name: &str, exact: bool) -> bool {
        self.index().contains(name, exact)
    }

    /// Resolve a name to an item (exact) or a pack.
    pub fn try_get_resource(&self, name: &str, exact: bool) -> Resolved {
        self.index().lookup(name, exact)
    }

    /// Resolve a name to a single item, applying size and type preferences
    /// in pack mode.
    pub fn try_get_item(
        &self,
        name: &str,
        exact: bool,
        content_type: Option<ContentType>,
        size_type: Option<SizeType>,
    ) -> Option<Arc<ResourceItem>> {
        self.index().find_item(name, exact, content_type, size_type)
    }

    /// Sorted item keys, optionally restricted to one extension.
    pub fn resource_names(&self, extension: Option<&str>) -> Vec<String> {
        self.index().names(extension)
    }

    /// The content of the best pack member for a name.
    pub fn bytes(
        &self,
        name: &str,
        content_type: Option<ContentType>,
        size_type: Option<SizeType>,
    ) -> Option<Bytes> {
        self.try_get_item(name, false, content_type, size_type)?
            .bytes()
    }

    /// The current colour scheme.
    pub fn color_scheme(&self) -> ColorScheme {
        *self.scheme.read()
    }

    /// Switch the colour scheme.
    ///
    /// Every cached themed image is invalidated; none is patched in place.
    pub fn set_color_scheme(&self, scheme: ColorScheme) {
        {
            let mut current = self.scheme.write();
            if *current == scheme {
                return;
            }
            *current = scheme;
        }

        let themed = self.themed.lock();
        for image in themed.values() {
            image.invalidate();
        }
        tracing::debug!(
            target: targets::SERVICE,
            %scheme,
            invalidated = themed.len(),
            "color scheme changed"
        );
    }

    fn themed_image(&self, item: &ResourceItem) -> Result<Arc<ThemedVectorImage>> {
        let mut themed = self.themed.lock();
        if let Some(existing) = themed.get(item.item_key()) {
            return Ok(Arc::clone(existing));
        }

        let source = VectorImage::from_bytes(item.item_key(), &item.load()?)?;
        let image = Arc::new(ThemedVectorImage::new(source));
        themed.insert(item.item_key().to_string(), Arc::clone(&image));
        Ok(image)
    }

    /// The vector image for a name in the current colour scheme.
    ///
    /// `target_size` is the square pixel size the image will be drawn at; a
    /// size of 16, 24 or 32 also selects the matching size tier. Without one,
    /// a size suffix in `name` (`-16x16`, `-large`, ...) selects the tier.
    /// Returns `Ok(None)` if no vector item matches.
    pub fn vector_image(
        &self,
        name: &str,
        target_size: Option<u32>,
    ) -> Result<Option<Arc<VectorImage>>> {
        let size_type = [
            target_size.map_or(SizeType::None, SizeType::from_pixels),
            ResourceName::parse(name).size_type(),
        ]
        .into_iter()
        .find(|size| *size != SizeType::None);
        let Some(item) = self.try_get_item(name, false, Some(ContentType::Vector), size_type) else {
            return Ok(None);
        };
        if item.content_type() != ContentType::Vector {
            return Ok(None);
        }

        let themed = self.themed_image(&item)?;
        Ok(Some(themed.image(self.color_scheme(), target_size, &self.palette)))
    }

    /// An empty composition on the configured canvas size.
    pub fn new_composition(&self) -> CompositionDescriptor {
        CompositionDescriptor::new(self.config.composition_base_size)
    }

    /// Compose vector images from this service into one image.
    ///
    /// Children are drawn in the current colour scheme.
    pub fn compose(&self, descriptor: &CompositionDescriptor) -> Result<VectorImage> {
        let provider = |name: &str| match self.vector_image(name, None) {
            Ok(image) => image.map(|image| (*image).clone()),
            Err(e) => {
                tracing::debug!(
                    target: targets::SERVICE,
                    image = name,
                    error = %e,
                    "composition child unavailable"
                );
                None
            }
        };
        Ok(server_resources_svg::compose(descriptor, &provider)?)
    }
}

impl fmt::Debug for ResourceService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = self.index();
        f.debug_struct("ResourceService")
            .field("sources", &self.sources.len())
            .field("items", &index.len())
            .field("packs", &index.pack_count())
            .field("scheme", &self.color_scheme())
            .finish()
    }
}
