//! Name resolution.
//!
//! Names are resolved in one of two modes:
//!
//! - **exact**: the normalized name is looked up as an item key
//! - **pack**: the name is reduced to its pack key and one pack member is
//!   selected by content type and size tier
//!
//! Pack selection returns a single-member pack's only item unconditionally.
//! Otherwise candidates are filtered by the requested content type and the
//! size tiers are tried in the order given by
//! [`SizeType::fallback_order`]; if no tier matches, the first candidate is
//! returned.

use std::sync::Arc;

use crate::index::ResourceIndex;
use crate::item::{ResourceItem, ResourcePack};
use crate::logging::targets;
use crate::naming::{ContentType, ResourceName, SizeType, normalize_name};

/// The outcome of a name lookup.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// An exact item.
    Item(Arc<ResourceItem>),
    /// All variants of a logical resource.
    Pack(Arc<ResourcePack>),
    /// Nothing matched.
    NotFound,
}

impl Resolved {
    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }

    /// The item, if this is an exact match.
    pub fn into_item(self) -> Option<Arc<ResourceItem>> {
        match self {
            Self::Item(item) => Some(item),
            _ => None,
        }
    }

    /// The pack, if this is a pack match.
    pub fn into_pack(self) -> Option<Arc<ResourcePack>> {
        match self {
            Self::Pack(pack) => Some(pack),
            _ => None,
        }
    }
}

/// Select the best member of a pack.
pub fn select_from_pack(
    pack: &ResourcePack,
    content_type: Option<ContentType>,
    size_type: Option<SizeType>,
) -> Option<Arc<ResourceItem>> {
    if let [only] = pack.items() {
        return Some(Arc::clone(only));
    }

    let candidates: Vec<&Arc<ResourceItem>> = match content_type {
        Some(content_type) => pack.of_type(content_type).collect(),
        None => pack.items().iter().collect(),
    };
    let first = *candidates.first()?;

    let requested = size_type.unwrap_or(SizeType::Large);
    for tier in requested.fallback_order() {
        if let Some(item) = candidates.iter().find(|item| item.size_type() == tier) {
            if tier != requested {
                tracing::trace!(
                    target: targets::RESOLVE,
                    pack = pack.key(),
                    ?requested,
                    ?tier,
                    "size fallback"
                );
            }
            return Some(Arc::clone(*item));
        }
    }

    Some(Arc::clone(first))
}

impl ResourceIndex {
    /// Resolve a name to an item (exact mode) or a pack (pack mode).
    pub fn lookup(&self, name: &str, exact: bool) -> Resolved {
        if exact {
            match self.item(&normalize_name(name)) {
                Some(item) => Resolved::Item(Arc::clone(item)),
                None => Resolved::NotFound,
            }
        } else {
            match self.pack(ResourceName::parse(name).pack_key()) {
                Some(pack) => Resolved::Pack(Arc::clone(pack)),
                None => Resolved::NotFound,
            }
        }
    }

    /// Whether a name resolves to anything.
    pub fn contains(&self, name: &str, exact: bool) -> bool {
        self.lookup(name, exact).is_found()
    }

    /// Resolve a name to a single item.
    ///
    /// Exact lookups ignore the content type and size filters.
    pub fn find_item(
        &self,
        name: &str,
        exact: bool,
        content_type: Option<ContentType>,
        size_type: Option<SizeType>,
    ) -> Option<Arc<ResourceItem>> {
        match self.lookup(name, exact) {
            Resolved::Item(item) => Some(item),
            Resolved::Pack(pack) => select_from_pack(&pack, content_type, size_type),
            Resolved::NotFound => None,
        }
    }

    /// Sorted item keys, optionally restricted to one extension.
    ///
    /// The filter is matched case-insensitively and may carry a leading dot.
    pub fn names(&self, extension: Option<&str>) -> Vec<String> {
        let extension = extension.map(|ext| ext.trim_start_matches('.').to_lowercase());
        let mut names: Vec<String> = self
            .items()
            .filter(|item| match &extension {
                Some(ext) => item.name().extension() == Some(ext.as_str()),
                None => true,
            })
            .map(|item| item.item_key().to_string())
            .collect();
        names.sort();
        names
    }
}
