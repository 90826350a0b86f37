//! Resource items and packs.

use std::sync::Arc;

use bytes::Bytes;

use crate::error::Result;
use crate::loader::ItemContent;
use crate::naming::{ContentType, ResourceName, SizeType};

/// A single named resource.
#[derive(Debug)]
pub struct ResourceItem {
    name: ResourceName,
    content: ItemContent,
}

impl ResourceItem {
    /// Create an item from a raw name and its content.
    pub fn new(name: &str, content: ItemContent) -> Self {
        Self {
            name: ResourceName::parse(name),
            content,
        }
    }

    /// The parsed name.
    pub fn name(&self) -> &ResourceName {
        &self.name
    }

    /// The normalized item key.
    pub fn item_key(&self) -> &str {
        self.name.item_key()
    }

    /// The pack key this item belongs to.
    pub fn pack_key(&self) -> &str {
        self.name.pack_key()
    }

    pub fn content_type(&self) -> ContentType {
        self.name.content_type()
    }

    pub fn size_type(&self) -> SizeType {
        self.name.size_type()
    }

    /// The content source of this item.
    pub fn content(&self) -> &ItemContent {
        &self.content
    }

    /// Materialize the content, reporting why it is unavailable.
    pub fn load(&self) -> Result<Bytes> {
        self.content.load()
    }

    /// The content bytes, or `None` if they are unavailable.
    pub fn bytes(&self) -> Option<Bytes> {
        self.content.bytes()
    }

    /// Whether content is available. Forces a load.
    pub fn exists(&self) -> bool {
        self.content.exists()
    }
}

/// The size and type variants of one logical resource.
///
/// Members are kept in insertion order and all share one pack key.
#[derive(Debug, Clone)]
pub struct ResourcePack {
    key: String,
    items: Vec<Arc<ResourceItem>>,
}

impl ResourcePack {
    /// Create an empty pack.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            items: Vec::new(),
        }
    }

    /// The shared pack key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Append a member.
    ///
    /// Returns `false` (and leaves the pack unchanged) if the item belongs to
    /// a different pack.
    pub fn push(&mut self, item: Arc<ResourceItem>) -> bool {
        if item.pack_key() != self.key {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Members in insertion order.
    pub fn items(&self) -> &[Arc<ResourceItem>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate the members of one content type.
    pub fn of_type(&self, content_type: ContentType) -> impl Iterator<Item = &Arc<ResourceItem>> {
        self.items
            .iter()
            .filter(move |item| item.content_type() == content_type)
    }
}
