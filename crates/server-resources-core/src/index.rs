//! The two-level resource index.
//!
//! An index holds every item keyed by its item key, and every pack keyed by
//! its pack key. An index is immutable once built; a reload builds a new
//! index and replaces the old one whole.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use crate::item::{ResourceItem, ResourcePack};
use crate::loader::ItemContent;
use crate::logging::{PerfSpan, targets};
use crate::reader::RetryPolicy;
use crate::source::{RawContent, RawResource, ResourceSource};

/// Items and packs of one index generation.
#[derive(Debug, Default, Clone)]
pub struct ResourceIndex {
    items: HashMap<String, Arc<ResourceItem>>,
    packs: HashMap<String, Arc<ResourcePack>>,
}

impl ResourceIndex {
    /// An index with no items. It reports itself as not loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index from the given sources, in order.
    ///
    /// A source that fails to enumerate is logged and contributes nothing;
    /// the build itself never fails.
    pub fn build(sources: &[Arc<dyn ResourceSource>], retry: &RetryPolicy) -> Self {
        let _span = PerfSpan::new("index_build");
        let mut index = Self::empty();

        for source in sources {
            match source.raw_resources() {
                Ok(raw) => {
                    let count = raw.len();
                    let added = index.extend_raw(raw, retry);
                    tracing::debug!(
                        target: targets::INDEX,
                        source = source.name(),
                        count,
                        added,
                        "ingested source"
                    );
                }
                Err(e) if e.is_file_missing() => {
                    tracing::debug!(
                        target: targets::INDEX,
                        source = source.name(),
                        "source file not present, skipping"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        target: targets::INDEX,
                        source = source.name(),
                        error = %e,
                        "skipping resource source"
                    );
                }
            }
        }

        tracing::info!(
            target: targets::INDEX,
            items = index.len(),
            packs = index.pack_count(),
            loaded = index.is_loaded(),
            "built resource index"
        );
        index
    }

    /// Build an index directly from raw resources.
    pub fn from_raw(raw: Vec<RawResource>, retry: &RetryPolicy) -> Self {
        let mut index = Self::empty();
        index.extend_raw(raw, retry);
        index
    }

    fn extend_raw(&mut self, raw: Vec<RawResource>, retry: &RetryPolicy) -> usize {
        let mut added = 0;
        for resource in raw {
            let content = match resource.content {
                RawContent::Archive(data) => ItemContent::from_archive(&data),
                RawContent::File(path) => ItemContent::from_file(path, *retry),
            };
            if self.insert(ResourceItem::new(&resource.name, content)) {
                added += 1;
            }
        }
        added
    }

    /// Insert an item if its item key is not taken yet.
    ///
    /// A newly inserted item is also appended to its pack. Returns `false`
    /// for a duplicate, which is dropped.
    pub fn insert(&mut self, item: ResourceItem) -> bool {
        let item = match self.items.entry(item.item_key().to_string()) {
            Entry::Occupied(_) => {
                tracing::trace!(
                    target: targets::INDEX,
                    key = item.item_key(),
                    "duplicate item key, keeping first"
                );
                return false;
            }
            Entry::Vacant(slot) => Arc::clone(slot.insert(Arc::new(item))),
        };

        let pack = self
            .packs
            .entry(item.pack_key().to_string())
            .or_insert_with(|| Arc::new(ResourcePack::new(item.pack_key())));
        Arc::make_mut(pack).push(item);
        true
    }

    /// Look up an item by normalized item key.
    pub fn item(&self, item_key: &str) -> Option<&Arc<ResourceItem>> {
        self.items.get(item_key)
    }

    /// Look up a pack by normalized pack key.
    pub fn pack(&self, pack_key: &str) -> Option<&Arc<ResourcePack>> {
        self.packs.get(pack_key)
    }

    /// Iterate all items in unspecified order.
    pub fn items(&self) -> impl Iterator<Item = &Arc<ResourceItem>> {
        self.items.values()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of packs.
    pub fn pack_count(&self) -> usize {
        self.packs.len()
    }

    /// True if at least one item was ingested.
    pub fn is_loaded(&self) -> bool {
        !self.items.is_empty()
    }
}
